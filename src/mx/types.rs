#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct MxRecord {
    pub preference: u16,
    pub exchange: String,
}

impl MxRecord {
    pub fn new(preference: u16, exchange: impl Into<String>) -> Self {
        Self {
            preference,
            exchange: exchange.into(),
        }
    }
}

/// Outcome of an MX resolution. Lookup failures are folded in as
/// [`MxStatus::Failed`] so callers never have to handle an error.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MxStatus {
    Records(Vec<MxRecord>),
    NoRecords,
    Failed { reason: String },
}

impl MxStatus {
    pub fn records(&self) -> &[MxRecord] {
        match self {
            Self::Records(records) => records.as_slice(),
            Self::NoRecords | Self::Failed { .. } => &[],
        }
    }

    pub fn has_records(&self) -> bool {
        !self.records().is_empty()
    }

    /// Exchange with the lowest preference value.
    pub fn primary(&self) -> Option<&MxRecord> {
        self.records().first()
    }
}
