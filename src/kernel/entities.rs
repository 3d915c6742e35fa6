use {
    serde::{
        Deserialize,
        Serialize,
    },
    std::fmt::{
        Display,
        Formatter,
    },
};

/// Human-readable tender reference, e.g. `RFQ-2026-0042`. Assigned from a
/// per-year sequence at creation and immutable afterwards.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReferenceId(String);

impl ReferenceId {
    pub fn new(year: i32, sequence: u32) -> Self {
        Self(format!("RFQ-{}-{:04}", year, sequence))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `(year, sequence)` of a well-formed reference, `None` otherwise.
    pub fn parts(&self) -> Option<(i32, u32)> {
        let mut pieces = self.0.splitn(3, '-');
        if pieces.next() != Some("RFQ") {
            return None;
        }
        let year = pieces.next()?.parse().ok()?;
        let sequence = pieces.next()?.parse().ok()?;
        Some((year, sequence))
    }
}

impl From<String> for ReferenceId {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

impl Display for ReferenceId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::ReferenceId;

    #[test]
    fn reference_is_year_scoped_and_zero_padded() {
        assert_eq!(ReferenceId::new(2026, 7).as_str(), "RFQ-2026-0007");
        assert_eq!(ReferenceId::new(2026, 1234).as_str(), "RFQ-2026-1234");
        assert_eq!(ReferenceId::new(2027, 10000).as_str(), "RFQ-2027-10000");
    }
}
