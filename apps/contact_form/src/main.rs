use std::{process::ExitCode, sync::Arc, time::Duration};

use anyhow::Result;
use clap::Parser;
use client_core::{
    ContactFormInput, ControllerConfig, RestContactStore, SubmissionController, SubmitOutcome,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod render;

#[derive(Parser, Debug)]
#[command(name = "contact-form", about = "Send a contact request to Colmado Cash")]
struct Args {
    #[arg(long, default_value = "http://127.0.0.1:8080")]
    server_url: String,
    #[arg(long, default_value = "")]
    full_name: String,
    #[arg(long, default_value = "")]
    email: String,
    #[arg(long, default_value = "")]
    phone: String,
    #[arg(long, default_value = "")]
    subject: String,
    #[arg(long, default_value = "")]
    message: String,
    /// Accept the privacy policy and the processing of personal data.
    #[arg(long)]
    accept_policy: bool,
    /// Seconds to wait for the store; 0 waits indefinitely.
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,
}

impl Args {
    fn form_input(&self) -> ContactFormInput {
        ContactFormInput {
            full_name: self.full_name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            subject: self.subject.clone(),
            message: self.message.clone(),
            accept_policy: self.accept_policy,
        }
    }

    fn controller_config(&self) -> ControllerConfig {
        ControllerConfig {
            insert_timeout: (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs)),
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let store = RestContactStore::new(&args.server_url)?;
    debug!(endpoint = %store.endpoint(), "contact store ready");
    let controller = SubmissionController::with_config(Arc::new(store), args.controller_config());

    controller.edit_input(|draft| *draft = args.form_input());
    let outcome = controller.submit(controller.input()).await;
    let lines = render::outcome_lines(&outcome, &controller.errors());

    if outcome == SubmitOutcome::Succeeded {
        for line in lines {
            println!("{line}");
        }
        Ok(ExitCode::SUCCESS)
    } else {
        for line in lines {
            eprintln!("{line}");
        }
        Ok(ExitCode::FAILURE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_map_onto_form_input() {
        let args = Args::parse_from([
            "contact-form",
            "--full-name",
            "Ana Ruiz",
            "--email",
            "ana@correo.com",
            "--subject",
            "Consulta",
            "--message",
            "Hola",
            "--accept-policy",
        ]);
        let input = args.form_input();
        assert_eq!(input.full_name, "Ana Ruiz");
        assert!(input.phone.is_empty());
        assert!(input.accept_policy);
        assert_eq!(
            args.controller_config().insert_timeout,
            Some(Duration::from_secs(30))
        );
    }

    #[test]
    fn zero_timeout_disables_the_bound() {
        let args = Args::parse_from(["contact-form", "--timeout-secs", "0"]);
        assert_eq!(args.controller_config().insert_timeout, None);
        assert!(!args.form_input().accept_policy);
    }
}
