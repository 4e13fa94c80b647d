use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// One of the five categories of documentation a hospital must supply.
///
/// The serialized form is the multipart field name used on the wire and the key
/// used inside a stored record's `documents` object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DocumentKind {
    #[serde(rename = "hospitalCert")]
    HospitalCert,
    #[serde(rename = "ambulanceLicense")]
    AmbulanceLicense,
    #[serde(rename = "fireNOC")]
    FireNoc,
    #[serde(rename = "biomedicalAuth")]
    BiomedicalAuth,
    #[serde(rename = "serviceAgreement")]
    ServiceAgreement,
}

impl DocumentKind {
    /// Every kind, in form order.
    pub const ALL: [DocumentKind; 5] = [
        DocumentKind::HospitalCert,
        DocumentKind::AmbulanceLicense,
        DocumentKind::FireNoc,
        DocumentKind::BiomedicalAuth,
        DocumentKind::ServiceAgreement,
    ];

    /// Field name on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::HospitalCert => "hospitalCert",
            DocumentKind::AmbulanceLicense => "ambulanceLicense",
            DocumentKind::FireNoc => "fireNOC",
            DocumentKind::BiomedicalAuth => "biomedicalAuth",
            DocumentKind::ServiceAgreement => "serviceAgreement",
        }
    }

    /// Human-readable label, as shown next to the picker button.
    pub fn label(&self) -> &'static str {
        match self {
            DocumentKind::HospitalCert => "Hospital Registration Certificate",
            DocumentKind::AmbulanceLicense => "Ambulance License",
            DocumentKind::FireNoc => "Fire NOC",
            DocumentKind::BiomedicalAuth => "Biomedical Waste Authorization",
            DocumentKind::ServiceAgreement => "Service Agreement",
        }
    }
}

impl FromStr for DocumentKind {
    type Err = anyhow::Error;

    /// Field names are matched exactly; `FireNOC` or `hospitalcert` are not kinds.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DocumentKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| anyhow::anyhow!("Unknown document kind: {}", s))
    }
}

impl Display for DocumentKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// Stored location per document kind. Every kind is always serialized, absent ones as `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentLocations {
    #[serde(rename = "hospitalCert")]
    pub hospital_cert: Option<String>,
    #[serde(rename = "ambulanceLicense")]
    pub ambulance_license: Option<String>,
    #[serde(rename = "fireNOC")]
    pub fire_noc: Option<String>,
    #[serde(rename = "biomedicalAuth")]
    pub biomedical_auth: Option<String>,
    #[serde(rename = "serviceAgreement")]
    pub service_agreement: Option<String>,
}

impl DocumentLocations {
    pub fn get(&self, kind: DocumentKind) -> Option<&str> {
        self.slot(kind).as_deref()
    }

    pub fn set(&mut self, kind: DocumentKind, location: impl Into<String>) {
        *self.slot_mut(kind) = Some(location.into());
    }

    /// Number of kinds with a stored location.
    pub fn present_count(&self) -> usize {
        DocumentKind::ALL
            .iter()
            .filter(|kind| self.get(**kind).is_some())
            .count()
    }

    fn slot(&self, kind: DocumentKind) -> &Option<String> {
        match kind {
            DocumentKind::HospitalCert => &self.hospital_cert,
            DocumentKind::AmbulanceLicense => &self.ambulance_license,
            DocumentKind::FireNoc => &self.fire_noc,
            DocumentKind::BiomedicalAuth => &self.biomedical_auth,
            DocumentKind::ServiceAgreement => &self.service_agreement,
        }
    }

    fn slot_mut(&mut self, kind: DocumentKind) -> &mut Option<String> {
        match kind {
            DocumentKind::HospitalCert => &mut self.hospital_cert,
            DocumentKind::AmbulanceLicense => &mut self.ambulance_license,
            DocumentKind::FireNoc => &mut self.fire_noc,
            DocumentKind::BiomedicalAuth => &mut self.biomedical_auth,
            DocumentKind::ServiceAgreement => &mut self.service_agreement,
        }
    }
}
