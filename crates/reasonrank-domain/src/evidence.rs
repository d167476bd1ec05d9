//! Evidence records, verification status and quality tiers

use crate::EvidenceId;

/// Verification status of an evidence record
///
/// Falsification is one-way inside the engine: nothing in this workspace
/// moves a record out of `Falsified`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VerificationStatus {
    /// Not yet reviewed
    #[default]
    Unverified,

    /// Reviewed and confirmed
    Verified,

    /// Shown to be false; contributes nothing
    Falsified,
}

impl VerificationStatus {
    /// Get the status name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            VerificationStatus::Unverified => "unverified",
            VerificationStatus::Verified => "verified",
            VerificationStatus::Falsified => "falsified",
        }
    }

    /// Parse a status from a string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "unverified" | "pending" => Some(VerificationStatus::Unverified),
            "verified" => Some(VerificationStatus::Verified),
            "falsified" | "debunked" => Some(VerificationStatus::Falsified),
            _ => None,
        }
    }

    /// Whether this status removes the record's contribution
    pub fn is_falsified(&self) -> bool {
        matches!(self, VerificationStatus::Falsified)
    }
}

/// Quality tier of an evidence source
///
/// - T1: Peer-reviewed research, official statistics
/// - T2: Expert analysis, established journalism
/// - T3: Secondary reporting, informed opinion
/// - T4: Anecdotal or unattributed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum QualityTier {
    /// Highest quality
    T1,

    /// High quality
    #[default]
    T2,

    /// Moderate quality
    T3,

    /// Lowest quality
    T4,
}

impl QualityTier {
    /// Get the tier name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityTier::T1 => "T1",
            QualityTier::T2 => "T2",
            QualityTier::T3 => "T3",
            QualityTier::T4 => "T4",
        }
    }

    /// Parse a tier from a string ("T1".."T4" or "1".."4")
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().trim_start_matches('T') {
            "1" => Some(QualityTier::T1),
            "2" => Some(QualityTier::T2),
            "3" => Some(QualityTier::T3),
            "4" => Some(QualityTier::T4),
            _ => None,
        }
    }

    /// The next stronger tier, if any
    pub fn stronger(&self) -> Option<Self> {
        match self {
            QualityTier::T1 => None,
            QualityTier::T2 => Some(QualityTier::T1),
            QualityTier::T3 => Some(QualityTier::T2),
            QualityTier::T4 => Some(QualityTier::T3),
        }
    }

    /// The next weaker tier, if any
    pub fn weaker(&self) -> Option<Self> {
        match self {
            QualityTier::T1 => Some(QualityTier::T2),
            QualityTier::T2 => Some(QualityTier::T3),
            QualityTier::T3 => Some(QualityTier::T4),
            QualityTier::T4 => None,
        }
    }
}

impl std::str::FromStr for QualityTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid quality tier: {}", s))
    }
}

/// Where a piece of evidence came from
#[derive(Debug, Clone, PartialEq)]
pub struct SourceDescriptor {
    /// Short description of the source
    pub title: String,

    /// Link to the source, if any
    pub url: Option<String>,
}

impl SourceDescriptor {
    /// Create a new source descriptor
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: None,
        }
    }

    /// Attach a URL
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}

/// An evidence record referenced by arguments and claims
#[derive(Debug, Clone, PartialEq)]
pub struct Evidence {
    /// Unique identifier
    pub id: EvidenceId,

    /// Verification status
    pub status: VerificationStatus,

    /// Quality tier
    pub tier: QualityTier,

    /// Source descriptors
    pub sources: Vec<SourceDescriptor>,
}

impl Evidence {
    /// Create a new unverified evidence record
    pub fn new(id: EvidenceId, tier: QualityTier) -> Self {
        Self {
            id,
            status: VerificationStatus::Unverified,
            tier,
            sources: Vec::new(),
        }
    }

    /// Set the verification status
    pub fn with_status(mut self, status: VerificationStatus) -> Self {
        self.status = status;
        self
    }

    /// Add a source descriptor
    pub fn with_source(mut self, source: SourceDescriptor) -> Self {
        self.sources.push(source);
        self
    }

    /// Mark this record falsified
    ///
    /// Returns `true` if the status changed.
    pub fn falsify(&mut self) -> bool {
        if self.status.is_falsified() {
            return false;
        }
        self.status = VerificationStatus::Falsified;
        true
    }

    /// Whether the record still contributes to scores
    pub fn is_live(&self) -> bool {
        !self.status.is_falsified()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_ordering() {
        assert!(QualityTier::T1 < QualityTier::T4);
        assert_eq!(QualityTier::T2.stronger(), Some(QualityTier::T1));
        assert_eq!(QualityTier::T1.stronger(), None);
        assert_eq!(QualityTier::T4.weaker(), None);
    }

    #[test]
    fn test_tier_parse() {
        assert_eq!(QualityTier::parse("t3"), Some(QualityTier::T3));
        assert_eq!(QualityTier::parse("1"), Some(QualityTier::T1));
        assert_eq!(QualityTier::parse("T9"), None);
        assert!("bogus".parse::<QualityTier>().is_err());
    }

    #[test]
    fn test_status_parse() {
        assert_eq!(VerificationStatus::parse("Verified"), Some(VerificationStatus::Verified));
        assert_eq!(VerificationStatus::parse("debunked"), Some(VerificationStatus::Falsified));
        assert_eq!(VerificationStatus::parse("maybe"), None);
    }

    #[test]
    fn test_falsify_is_one_way() {
        let mut evidence = Evidence::new(EvidenceId::from_value(1), QualityTier::T1)
            .with_status(VerificationStatus::Verified)
            .with_source(SourceDescriptor::new("Lancet study").with_url("https://example.org"));

        assert!(evidence.is_live());
        assert!(evidence.falsify());
        assert!(!evidence.is_live());
        assert!(!evidence.falsify(), "second falsification is a no-op");
        assert_eq!(evidence.sources.len(), 1);
    }
}
