use anyhow::{Context, Result};
use school_run_tracker::prelude::*;
use serde::Serialize;
use std::fmt::Write;

#[derive(Serialize)]
struct BoardRow<'a> {
    student_id: &'a StudentIdentifier,
    stop_order: i64,
    status: EtaStatus,
    category: String,
}

#[derive(Serialize)]
struct BoardDocument<'a> {
    trip: String,
    students: Vec<BoardRow<'a>>,
    progress: TripProgress,
    next_stop: Option<&'a StudentIdentifier>,
}

/// One line per stop, then the progress summary.
pub fn render_text(snapshot: &RouteSnapshot, board: &[BoardEntry]) -> String {
    let mut out = String::new();
    let next = snapshot.next_stop().map(|s| &s.id);

    let _ = writeln!(out, "Trip {}", snapshot.key);
    for entry in board {
        let marker = if Some(&entry.student_id) == next { "  <- next" } else { "" };
        let _ = writeln!(out, "#{} {} {}{}", entry.stop_order, entry.student_id, entry.status, marker);
    }

    let progress = snapshot.progress();
    let _ = writeln!(
        out,
        "{} students, {} picked, {} dropped, {} remaining ({}%)",
        progress.total, progress.picked, progress.dropped, progress.remaining, progress.percent
    );
    out
}

pub fn render_json(snapshot: &RouteSnapshot, board: &[BoardEntry]) -> Result<String> {
    let document = BoardDocument {
        trip: snapshot.key.to_string(),
        students: board
            .iter()
            .map(|e| BoardRow {
                student_id: &e.student_id,
                stop_order: e.stop_order,
                status: e.status,
                category: e.status.category().to_string(),
            })
            .collect(),
        progress: snapshot.progress(),
        next_stop: snapshot.next_stop().map(|s| &s.id),
    };
    serde_json::to_string_pretty(&document).context("Failed to serialize board")
}

/// Status line and timeline for a single student.
pub fn render_student(snapshot: &RouteSnapshot, student_id: &StudentIdentifier) -> String {
    let mut out = String::new();
    let status = snapshot.estimate_for(student_id);
    let _ = writeln!(out, "{} [{}] {}", student_id, status.category(), status);

    for entry in snapshot.log.timeline_for(student_id) {
        let marker = if entry.highlight { "*" } else { " " };
        let _ = writeln!(out, "{} {} {}", marker, entry.time, entry.title);
    }
    out
}
