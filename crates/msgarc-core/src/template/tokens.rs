//! Fixed `%xx` tokens carrying message metadata.

/// Values substituted for the fixed tokens.
#[derive(Debug, Clone, Copy)]
pub(super) struct TokenValues<'a> {
    pub message_id: &'a str,
    pub from_party: &'a str,
    pub to_party: &'a str,
    pub from_service: &'a str,
    pub to_service: &'a str,
    /// Already formatted `%TS` value.
    pub timestamp: &'a str,
}

impl<'a> TokenValues<'a> {
    /// Case-sensitive: `%ts` is the receiver service, `%TS` the timestamp.
    fn lookup(&self, token: &str) -> Option<&'a str> {
        match token {
            "id" => Some(self.message_id),
            "fp" => Some(self.from_party),
            "tp" => Some(self.to_party),
            "fs" => Some(self.from_service),
            "ts" => Some(self.to_service),
            "TS" => Some(self.timestamp),
            _ => None,
        }
    }
}

/// Replaces every fixed token in one left-to-right sweep.
///
/// Substituted values are not rescanned, so a party name containing `%id`
/// stays as written. Unknown `%` sequences are copied unchanged.
pub(super) fn substitute(template: &str, values: &TokenValues<'_>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(pos) = rest.find('%') {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];
        match after.get(..2).and_then(|t| values.lookup(t)) {
            Some(value) => {
                out.push_str(value);
                rest = &after[2..];
            }
            None => {
                out.push('%');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values() -> TokenValues<'static> {
        TokenValues {
            message_id: "X",
            from_party: "Y",
            to_party: "P2",
            from_service: "S1",
            to_service: "S2",
            timestamp: "T",
        }
    }

    #[test]
    fn replaces_all_tokens() {
        assert_eq!(substitute("%id-%fp", &values()), "X-Y");
        assert_eq!(
            substitute("%tp/%fs/%ts/%TS/%id%id", &values()),
            "P2/S1/S2/T/XX"
        );
    }

    #[test]
    fn unknown_and_trailing_percent_kept() {
        assert_eq!(substitute("100%", &values()), "100%");
        assert_eq!(substitute("%xx%%id", &values()), "%xx%X");
        assert_eq!(substitute("%i", &values()), "%i");
    }

    #[test]
    fn values_are_not_rescanned() {
        let v = TokenValues {
            from_party: "%id",
            ..values()
        };
        assert_eq!(substitute("%fp-%id", &v), "%id-X");
    }

    #[test]
    fn multibyte_after_percent() {
        assert_eq!(substitute("%é-%id", &values()), "%é-X");
    }
}
