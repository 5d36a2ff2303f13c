//! Risk screening predicate.
//!
//! Stands in for real AML/sanctions screening: the default implementation
//! flags a company whose name contains a denylisted token.

/// Default denylist token.
pub const DEFAULT_DENYLIST_TOKEN: &str = "risky";

/// Decides whether a company must be declined.
pub trait RiskPredicate: Send + Sync {
    fn is_risky(&self, company_name: &str) -> bool;
}

impl<F> RiskPredicate for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn is_risky(&self, company_name: &str) -> bool {
        self(company_name)
    }
}

/// Case-insensitive substring match against a set of tokens.
#[derive(Debug, Clone)]
pub struct DenylistPredicate {
    tokens: Vec<String>,
}

impl DenylistPredicate {
    /// Build from tokens. Blank tokens are ignored; they would match every name.
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            tokens: tokens
                .into_iter()
                .map(|t| t.as_ref().trim().to_lowercase())
                .filter(|t| !t.is_empty())
                .collect(),
        }
    }

    /// Parse a comma-separated token list.
    pub fn from_csv(csv: &str) -> Self {
        Self::new(csv.split(','))
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }
}

impl Default for DenylistPredicate {
    fn default() -> Self {
        Self::new([DEFAULT_DENYLIST_TOKEN])
    }
}

impl RiskPredicate for DenylistPredicate {
    fn is_risky(&self, company_name: &str) -> bool {
        let name = company_name.to_lowercase();
        self.tokens.iter().any(|token| name.contains(token.as_str()))
    }
}
