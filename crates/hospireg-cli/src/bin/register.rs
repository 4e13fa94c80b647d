use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use hospireg_cli::{init_tracing, ConsoleHost, PathPicker};
use hospireg_client::{ClientConfig, HttpTransport, Platform, RegistrationController};
use hospireg_core::DocumentKind;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PlatformArg {
    Android,
    Ios,
}

impl From<PlatformArg> for Platform {
    fn from(arg: PlatformArg) -> Self {
        match arg {
            PlatformArg::Android => Platform::Android,
            PlatformArg::Ios => Platform::Ios,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "register")]
#[command(about = "Submit a hospital registration with its five supporting documents")]
struct Args {
    /// Hospital name
    #[arg(long)]
    name: String,

    /// Address line; repeat up to three times
    #[arg(long = "address-line", value_name = "TEXT", num_args = 1, action = clap::ArgAction::Append)]
    address_lines: Vec<String>,

    /// Hospital registration certificate image
    #[arg(long, value_name = "PATH")]
    hospital_cert: PathBuf,

    /// Ambulance license image
    #[arg(long, value_name = "PATH")]
    ambulance_license: PathBuf,

    /// Fire safety NOC image
    #[arg(long, value_name = "PATH")]
    fire_noc: PathBuf,

    /// Biomedical waste authorization image
    #[arg(long, value_name = "PATH")]
    biomedical_auth: PathBuf,

    /// Service agreement image
    #[arg(long, value_name = "PATH")]
    service_agreement: PathBuf,

    /// Upload service base URL (default: HOSPIREG_API_URL, API_URL or http://localhost:3000)
    #[arg(long, value_name = "URL")]
    api_url: Option<String>,

    /// How file URIs are written into the upload
    #[arg(long, value_enum, default_value = "android")]
    platform: PlatformArg,
}

impl Args {
    fn document_paths(&self) -> HashMap<DocumentKind, PathBuf> {
        HashMap::from([
            (DocumentKind::HospitalCert, self.hospital_cert.clone()),
            (DocumentKind::AmbulanceLicense, self.ambulance_license.clone()),
            (DocumentKind::FireNoc, self.fire_noc.clone()),
            (DocumentKind::BiomedicalAuth, self.biomedical_auth.clone()),
            (DocumentKind::ServiceAgreement, self.service_agreement.clone()),
        ])
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let args = Args::parse();
    if args.address_lines.len() > 3 {
        return Err(anyhow::anyhow!("At most three --address-line values are accepted"));
    }

    let config = match &args.api_url {
        Some(url) => ClientConfig::new(url.clone()),
        None => ClientConfig::from_env(),
    };
    tracing::info!(base_url = %config.base_url, "Submitting registration");

    let controller = RegistrationController::new(
        args.platform.into(),
        Arc::new(PathPicker::new(args.document_paths())),
        Arc::new(ConsoleHost),
        Arc::new(HttpTransport::new(config)?),
    );

    controller.set_name(&args.name);
    for (index, line) in args.address_lines.iter().enumerate() {
        controller.set_address_line(index, line);
    }

    for kind in DocumentKind::ALL {
        tracing::debug!(document = kind.label(), "Attaching document");
        controller.select_document(kind).await?;
    }

    let receipt = controller.submit().await?;
    match receipt.inserted_id {
        Some(id) => println!("Registration id: {}", id),
        None => println!("Registration accepted (status {})", receipt.status),
    }

    Ok(())
}
