// Copyright (c) 2024 The Envprobe Authors
//
// SPDX-License-Identifier: Apache-2.0
//

use std::fmt::Write;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use crate::arch::{Architecture, ProcessArchitecture};

/// External encodings of a report.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, EnumString, AsRefStr, Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ReportFormat {
    /// A single JSON object.
    #[default]
    Json,

    /// One `field=value` pair per line.
    Kv,
}

/// Snapshot of the host environment produced by one probe run.
///
/// Facets that could not be determined carry their sentinel: `unknown`
/// architecture, `false` elevation, empty version and username, session `0`
/// and `[0, 0]` code pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentReport {
    architecture: Architecture,
    process_architecture: ProcessArchitecture,
    is_elevated: bool,
    os_version_string: String,
    username: String,
    session_id: u32,
    ansi_code_page: [u8; 2],
    oem_code_page: [u8; 2],
}

pub(crate) struct ReportFields {
    pub architecture: Architecture,
    pub is_elevated: bool,
    pub os_version_string: String,
    pub username: String,
    pub session_id: u32,
    pub ansi_code_page: [u8; 2],
    pub oem_code_page: [u8; 2],
}

impl EnvironmentReport {
    pub(crate) fn new(fields: ReportFields) -> Self {
        Self {
            architecture: fields.architecture,
            process_architecture: ProcessArchitecture::current(),
            is_elevated: fields.is_elevated,
            os_version_string: fields.os_version_string,
            username: fields.username,
            session_id: fields.session_id,
            ansi_code_page: fields.ansi_code_page,
            oem_code_page: fields.oem_code_page,
        }
    }

    pub fn architecture(&self) -> Architecture {
        self.architecture
    }

    pub fn process_architecture(&self) -> ProcessArchitecture {
        self.process_architecture
    }

    pub fn is_elevated(&self) -> bool {
        self.is_elevated
    }

    pub fn os_version_string(&self) -> &str {
        &self.os_version_string
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn session_id(&self) -> u32 {
        self.session_id
    }

    pub fn ansi_code_page(&self) -> [u8; 2] {
        self.ansi_code_page
    }

    pub fn oem_code_page(&self) -> [u8; 2] {
        self.oem_code_page
    }

    pub fn to_json(&self, pretty: bool) -> serde_json::Result<String> {
        if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        }
    }

    /// Flat `field=value` lines in declaration order. Code pages are written
    /// as the hex of their two little-endian bytes.
    pub fn to_key_value(&self) -> String {
        let mut out = String::new();
        let fields: [(&str, String); 8] = [
            ("architecture", self.architecture.to_string()),
            ("processArchitecture", self.process_architecture.to_string()),
            ("isElevated", self.is_elevated.to_string()),
            ("osVersionString", self.os_version_string.clone()),
            ("username", self.username.clone()),
            ("sessionId", self.session_id.to_string()),
            ("ansiCodePage", hex::encode(self.ansi_code_page)),
            ("oemCodePage", hex::encode(self.oem_code_page)),
        ];
        for (key, value) in fields {
            // writing into a String cannot fail
            let _ = writeln!(out, "{key}={value}");
        }
        out
    }

    pub fn encode(&self, format: ReportFormat, pretty: bool) -> serde_json::Result<String> {
        match format {
            ReportFormat::Json => self.to_json(pretty),
            ReportFormat::Kv => Ok(self.to_key_value()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_report() -> EnvironmentReport {
        EnvironmentReport::new(ReportFields {
            architecture: Architecture::X64,
            is_elevated: true,
            os_version_string: "10.0.19045".to_string(),
            username: "alice".to_string(),
            session_id: 2,
            ansi_code_page: [0xE9, 0xFD],
            oem_code_page: [0xE9, 0xFD],
        })
    }

    #[test]
    fn test_json_field_names() {
        let report = sample_report();
        let value: serde_json::Value =
            serde_json::from_str(&report.to_json(false).unwrap()).unwrap();

        assert_eq!(value["architecture"], "x64");
        assert_eq!(value["processArchitecture"], report.process_architecture().as_ref());
        assert_eq!(value["isElevated"], true);
        assert_eq!(value["osVersionString"], "10.0.19045");
        assert_eq!(value["username"], "alice");
        assert_eq!(value["sessionId"], 2);
        assert_eq!(value["ansiCodePage"], serde_json::json!([233, 253]));
        assert_eq!(value["oemCodePage"], serde_json::json!([233, 253]));
    }

    #[test]
    fn test_json_deserialize() {
        let report = sample_report();
        let parsed: EnvironmentReport =
            serde_json::from_str(&report.to_json(true).unwrap()).unwrap();
        assert_eq!(parsed, report);
    }

    #[test]
    fn test_key_value() {
        let report = sample_report();
        let expected = format!(
            "architecture=x64\n\
             processArchitecture={}\n\
             isElevated=true\n\
             osVersionString=10.0.19045\n\
             username=alice\n\
             sessionId=2\n\
             ansiCodePage=e9fd\n\
             oemCodePage=e9fd\n",
            ProcessArchitecture::current()
        );
        assert_eq!(report.to_key_value(), expected);
        assert_eq!(report.encode(ReportFormat::Kv, true).unwrap(), expected);
    }

    #[test]
    fn test_report_format_names() {
        assert_eq!("kv".parse::<ReportFormat>().unwrap(), ReportFormat::Kv);
        assert_eq!(ReportFormat::default(), ReportFormat::Json);
        let format: ReportFormat = serde_json::from_str("\"json\"").unwrap();
        assert_eq!(format, ReportFormat::Json);
    }
}
