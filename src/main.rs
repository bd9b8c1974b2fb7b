/*
 * WHOIS Client with IDN Support
 * Copyright (C) 2025 Akaere Networks
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU Affero General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU Affero General Public License for more details.
 *
 * You should have received a copy of the GNU Affero General Public License
 * along with this program. If not, see <https://www.gnu.org/licenses/>.
 */

use std::io::Write;
use std::process::ExitCode;

use clap::Parser;

use whois_client::config::{Cli, Settings};
use whois_client::core::logger;
use whois_client::core::{
    EncodingDetector, WhoisError, platform_detector, render, sanitize_error_message,
};
use whois_client::{WhoisLookup, log_debug, log_error, log_info};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = logger::init_from_args(cli.debug) {
        eprintln!("Failed to initialize logger: {}", e);
    }

    let detected = platform_detector().detect_encodings();
    let settings = match Settings::from_cli(&cli, detected) {
        Ok(settings) => settings,
        Err(e) => return fail(&WhoisError::from(e)),
    };
    log_debug!(
        "Codepages: input {}, output {}; mode {:?}",
        settings.encodings.input,
        settings.encodings.output,
        settings.mode
    );

    let lookup = WhoisLookup::new(settings.lookup.clone());
    let hops = match whois_client::run_query(
        &settings.raw_domain,
        settings.encodings.input,
        settings.server.as_deref(),
        settings.mode,
        &lookup,
    )
    .await
    {
        Ok(hops) => hops,
        Err(e) => return fail(&e),
    };

    let output = render(&hops, settings.encodings.output);
    let mut stdout = std::io::stdout().lock();
    if let Err(e) = stdout.write_all(&output).and_then(|_| stdout.flush()) {
        log_error!("Failed to write output: {}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

/// The one place errors turn into user-facing text
fn fail(error: &WhoisError) -> ExitCode {
    match error {
        WhoisError::InvalidDomain { rejection, .. } => {
            log_debug!("Validation rejected the name: {}", rejection);
        }
        WhoisError::Lookup(lookup_error) if lookup_error.is_recoverable() => {
            log_info!("The lookup may succeed if retried");
        }
        _ => {}
    }

    eprintln!("{}", sanitize_error_message(&error.to_string()));
    ExitCode::FAILURE
}
