// WHOIS Client - Result Selection
// Copyright (C) 2025 Akaere Networks
// SPDX-License-Identifier: AGPL-3.0-or-later

/// Which hop(s) of a referral chain the user wants to see
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QueryMode {
    First,
    Last,
    All,
    /// No flag given; behaves like `Last`
    #[default]
    Unspecified,
}

impl QueryMode {
    pub fn effective(self) -> Self {
        match self {
            QueryMode::Unspecified => QueryMode::Last,
            mode => mode,
        }
    }

    /// Whether referrals have to be followed at all
    pub fn follows_referrals(self) -> bool {
        self.effective() != QueryMode::First
    }
}

/// One server response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hop {
    pub text: String,
    pub server: String,
}

impl Hop {
    pub fn new(text: impl Into<String>, server: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            server: server.into(),
        }
    }
}

/// What the lookup hands back: one response, or every hop in referral order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupResult {
    Single(Hop),
    Chain(Vec<Hop>),
}

/// Pick the hops to render. A single response is always emitted as-is; a
/// chain is cut down according to `mode` without reordering.
pub fn select(result: LookupResult, mode: QueryMode) -> Vec<Hop> {
    match result {
        LookupResult::Single(hop) => vec![hop],
        LookupResult::Chain(mut hops) => match mode.effective() {
            QueryMode::All => hops,
            QueryMode::First => {
                hops.truncate(1);
                hops
            }
            _ => hops.pop().into_iter().collect(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain() -> LookupResult {
        LookupResult::Chain(vec![
            Hop::new("textA", "srv1"),
            Hop::new("textB", "srv2"),
            Hop::new("textC", "srv3"),
        ])
    }

    #[test]
    fn test_all_keeps_order() {
        let hops = select(
            LookupResult::Chain(vec![Hop::new("textA", "srv1"), Hop::new("textB", "srv2")]),
            QueryMode::All,
        );
        assert_eq!(hops, vec![Hop::new("textA", "srv1"), Hop::new("textB", "srv2")]);
    }

    #[test]
    fn test_first_and_last() {
        assert_eq!(select(chain(), QueryMode::First), vec![Hop::new("textA", "srv1")]);
        assert_eq!(select(chain(), QueryMode::Last), vec![Hop::new("textC", "srv3")]);
        assert_eq!(select(chain(), QueryMode::Unspecified), vec![Hop::new("textC", "srv3")]);
    }

    #[test]
    fn test_single_ignores_mode() {
        for mode in [QueryMode::First, QueryMode::Last, QueryMode::All, QueryMode::Unspecified] {
            let hops = select(LookupResult::Single(Hop::new("only", "whois.iana.org")), mode);
            assert_eq!(hops, vec![Hop::new("only", "whois.iana.org")]);
        }
    }

    #[test]
    fn test_empty_chain_emits_nothing() {
        assert!(select(LookupResult::Chain(Vec::new()), QueryMode::Last).is_empty());
        assert!(select(LookupResult::Chain(Vec::new()), QueryMode::First).is_empty());
    }

    #[test]
    fn test_mode_defaults() {
        assert_eq!(QueryMode::default(), QueryMode::Unspecified);
        assert_eq!(QueryMode::Unspecified.effective(), QueryMode::Last);
        assert!(QueryMode::Unspecified.follows_referrals());
        assert!(!QueryMode::First.follows_referrals());
    }
}
