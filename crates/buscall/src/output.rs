use std::io::{IsTerminal, Write};
use std::time::{SystemTime, UNIX_EPOCH};

use buscall_depot::ReceiveEvent;
use buscall_kiosk::{ChannelOutcome, TransmitReport};
use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct EventOutput<'a> {
    channel: &'static str,
    #[serde(flatten)]
    event: &'a ReceiveEvent,
    timestamp: String,
}

/// Print one receiver event. Messages are the depot's display sink.
pub fn print_event(event: &ReceiveEvent, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out = EventOutput {
                channel: event.channel().name(),
                event,
                timestamp: now_unix_seconds(),
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["CHANNEL", "EVENT", "DETAIL"])
                .add_row(vec![
                    event.channel().name().to_string(),
                    event_name(event).to_string(),
                    event_detail(event),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!(
                "channel={} event={} {}",
                event.channel(),
                event_name(event),
                event_detail(event)
            );
        }
        OutputFormat::Raw => {
            if let ReceiveEvent::Message { text } = event {
                print_raw(format!("{text}\n").as_bytes());
            }
        }
    }
}

/// Print what one transmission handed to the network.
pub fn print_report(report: &TransmitReport, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string(report).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["ROUTE", "CHANNEL", "STATUS", "DETAIL"]);
            for (channel, outcome) in [("image", &report.image), ("text", &report.text)] {
                table.add_row(vec![
                    report.route.clone(),
                    channel.to_string(),
                    outcome_status(outcome).to_string(),
                    outcome_detail(outcome),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!(
                "route={} image={} ({}) text={} ({})",
                report.route,
                outcome_status(&report.image),
                outcome_detail(&report.image),
                outcome_status(&report.text),
                outcome_detail(&report.text)
            );
        }
        OutputFormat::Raw => {
            println!(
                "{} {}",
                outcome_status(&report.image),
                outcome_status(&report.text)
            );
        }
    }
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.flush();
}

fn event_name(event: &ReceiveEvent) -> &'static str {
    match event {
        ReceiveEvent::ImageStored { .. } => "image_stored",
        ReceiveEvent::ImageDropped { .. } => "image_dropped",
        ReceiveEvent::Message { .. } => "message",
    }
}

fn event_detail(event: &ReceiveEvent) -> String {
    match event {
        ReceiveEvent::ImageStored { bytes, path } => {
            format!("{bytes} bytes -> {}", path.display())
        }
        ReceiveEvent::ImageDropped { bytes, reason } => format!("{bytes} bytes dropped: {reason}"),
        ReceiveEvent::Message { text } => text.clone(),
    }
}

fn outcome_status(outcome: &ChannelOutcome) -> &'static str {
    match outcome {
        ChannelOutcome::Sent { .. } => "sent",
        ChannelOutcome::Skipped { .. } => "skipped",
        ChannelOutcome::Failed { .. } => "failed",
    }
}

fn outcome_detail(outcome: &ChannelOutcome) -> String {
    match outcome {
        ChannelOutcome::Sent { bytes } => format!("{bytes} bytes"),
        ChannelOutcome::Skipped { reason } | ChannelOutcome::Failed { reason } => reason.clone(),
    }
}

fn now_unix_seconds() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs().to_string())
        .unwrap_or_else(|_| "0".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_output_flattens_event_fields() {
        let event = ReceiveEvent::Message {
            text: "hi".to_string(),
        };
        let out = EventOutput {
            channel: event.channel().name(),
            event: &event,
            timestamp: "0".to_string(),
        };
        let json = serde_json::to_string(&out).expect("event output should serialize");
        assert_eq!(
            json,
            r#"{"channel":"text","event":"message","text":"hi","timestamp":"0"}"#
        );
    }

    #[test]
    fn outcome_detail_shows_reason() {
        let skipped = ChannelOutcome::Skipped {
            reason: "no image".to_string(),
        };
        assert_eq!(outcome_status(&skipped), "skipped");
        assert_eq!(outcome_detail(&skipped), "no image");
        assert_eq!(outcome_detail(&ChannelOutcome::Sent { bytes: 4 }), "4 bytes");
    }
}
