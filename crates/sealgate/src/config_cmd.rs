// SPDX-FileCopyrightText: 2026 Sealgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `sealgate config` command implementation.

use sealgate_config::SealgateConfig;

/// Print the effective configuration as TOML with the shared secret redacted.
pub fn run_config(config: &SealgateConfig) {
    match render_config(config) {
        Ok(rendered) => print!("{rendered}"),
        Err(e) => eprintln!("sealgate: cannot render configuration: {e}"),
    }
}

fn render_config(config: &SealgateConfig) -> Result<String, toml::ser::Error> {
    let mut shown = config.clone();
    if shown.gateway.secret.is_some() {
        shown.gateway.secret = Some("[redacted]".to_string());
    }
    toml::to_string_pretty(&shown)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secret_is_redacted() {
        let mut config = SealgateConfig::default();
        config.gateway.host = "sso.example.com".to_string();
        config.gateway.secret = Some("radius-secret".to_string());

        let rendered = render_config(&config).unwrap();
        assert!(rendered.contains("[redacted]"));
        assert!(!rendered.contains("radius-secret"));
    }

    #[test]
    fn missing_secret_stays_absent() {
        let rendered = render_config(&SealgateConfig::default()).unwrap();
        assert!(!rendered.contains("[redacted]"));
    }

    #[test]
    fn all_sections_are_rendered() {
        let rendered = render_config(&SealgateConfig::default()).unwrap();
        for section in ["[gateway]", "[auth]", "[storage]", "[log]"] {
            assert!(rendered.contains(section), "missing {section}");
        }
    }
}
