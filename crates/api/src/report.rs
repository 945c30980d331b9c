// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Closed-ticket report rendering.

use std::fmt::Write as _;
use std::str::FromStr;

use time::OffsetDateTime;
use time::format_description::well_known::Iso8601;

use helpdesk_domain::Ticket;

use crate::error::ApiError;

/// Records per page in the text rendering.
const TEXT_PAGE_SIZE: usize = 20;

/// The formats a closed-ticket report can be rendered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    /// Comma-separated values with a header row.
    Csv,
    /// Paginated plain text.
    Text,
}

impl FromStr for ReportFormat {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "text" => Ok(Self::Text),
            other => Err(ApiError::InvalidArgument {
                message: format!("Invalid report format: '{other}'. Must be csv or text"),
            }),
        }
    }
}

/// A rendered report, ready to serve as a download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportDocument {
    /// The rendered bytes.
    pub bytes: Vec<u8>,
    /// The MIME content type.
    pub content_type: &'static str,
    /// The suggested download filename.
    pub filename: String,
}

fn format_close_timestamp(ticket: &Ticket) -> Result<String, ApiError> {
    let Some(closed_at) = ticket.closed_at else {
        return Err(ApiError::Internal {
            message: String::from("Open ticket reached the closed-ticket report"),
        });
    };
    closed_at
        .format(&Iso8601::DEFAULT)
        .map_err(|e| ApiError::Internal {
            message: format!("Failed to format timestamp: {e}"),
        })
}

/// Renders a closed-ticket report in the requested format.
///
/// # Arguments
///
/// * `tickets` - The closed tickets in the reporting window
/// * `format` - The rendering format
/// * `generated_at` - The generation timestamp, stamped into the text
///   rendering's page headers
///
/// # Errors
///
/// Returns an error if any ticket lacks a close timestamp or rendering
/// fails.
pub fn render(
    tickets: &[Ticket],
    format: ReportFormat,
    generated_at: OffsetDateTime,
) -> Result<ReportDocument, ApiError> {
    match format {
        ReportFormat::Csv => render_csv(tickets),
        ReportFormat::Text => render_text(tickets, generated_at),
    }
}

fn render_csv(tickets: &[Ticket]) -> Result<ReportDocument, ApiError> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer
        .write_record(["subject", "description", "closed_at"])
        .map_err(|e| ApiError::Internal {
            message: format!("CSV rendering failed: {e}"),
        })?;

    for ticket in tickets {
        let closed_at: String = format_close_timestamp(ticket)?;
        writer
            .write_record([&ticket.subject, &ticket.description, &closed_at])
            .map_err(|e| ApiError::Internal {
                message: format!("CSV rendering failed: {e}"),
            })?;
    }

    let bytes: Vec<u8> = writer.into_inner().map_err(|e| ApiError::Internal {
        message: format!("CSV rendering failed: {e}"),
    })?;

    Ok(ReportDocument {
        bytes,
        content_type: "text/csv",
        filename: String::from("tickets_report.csv"),
    })
}

fn render_text(
    tickets: &[Ticket],
    generated_at: OffsetDateTime,
) -> Result<ReportDocument, ApiError> {
    let generated_str: String = generated_at
        .format(&Iso8601::DEFAULT)
        .map_err(|e| ApiError::Internal {
            message: format!("Failed to format timestamp: {e}"),
        })?;

    let page_count: usize = tickets.len().div_ceil(TEXT_PAGE_SIZE).max(1);
    let mut out: String = String::new();

    for (page_index, page) in tickets.chunks(TEXT_PAGE_SIZE).enumerate() {
        let _ = writeln!(
            out,
            "Closed Tickets Report - page {} of {page_count} (generated {generated_str})",
            page_index + 1
        );
        let _ = writeln!(out, "{}", "=".repeat(72));

        for ticket in page {
            let closed_at: String = format_close_timestamp(ticket)?;
            let _ = writeln!(out, "Subject:     {}", ticket.subject);
            let _ = writeln!(out, "Description: {}", ticket.description);
            let _ = writeln!(out, "Closed at:   {closed_at}");
            let _ = writeln!(out, "{}", "-".repeat(72));
        }
        let _ = writeln!(out);
    }

    Ok(ReportDocument {
        bytes: out.into_bytes(),
        content_type: "text/plain",
        filename: String::from("tickets_report.txt"),
    })
}
