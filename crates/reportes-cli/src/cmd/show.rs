//! `rp show` — one ticket with its comment log.

use crate::cmd::{self, Workspace};
use crate::output::{OutputMode, pretty_kv, pretty_section, render_mode};
use clap::Args;
use reportes_core::db::query;
use reportes_core::model::{Comment, Ticket};
use serde::Serialize;
use std::io::{self, Write};
use std::path::Path;

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Ticket id.
    pub id: i64,
}

#[derive(Debug, Serialize)]
struct ShowOutput {
    #[serde(flatten)]
    ticket: Ticket,
    comments: Vec<Comment>,
}

fn render_text(out: &ShowOutput, w: &mut dyn Write) -> io::Result<()> {
    let t = &out.ticket;
    writeln!(w, "id           {}", t.id)?;
    writeln!(w, "status       {}", t.status)?;
    writeln!(w, "date         {}", t.date)?;
    writeln!(w, "floor        {}", t.floor)?;
    writeln!(w, "office       {}", t.office)?;
    writeln!(w, "reporter     {}", t.reporter)?;
    writeln!(w, "reason       {}", t.reason)?;
    writeln!(w, "resolved_by  {}", t.resolved_by)?;
    for c in &out.comments {
        writeln!(w, "comment      {}  {}  {}", c.created_at, c.author, c.body)?;
    }
    Ok(())
}

fn render_pretty(out: &ShowOutput, w: &mut dyn Write) -> io::Result<()> {
    let t = &out.ticket;
    pretty_section(w, &format!("Ticket #{}", t.id))?;
    pretty_kv(w, "Status", cmd::status_label(&t.status))?;
    pretty_kv(w, "Date", &t.date)?;
    pretty_kv(w, "Floor", t.floor.to_string())?;
    pretty_kv(w, "Office", &t.office)?;
    pretty_kv(w, "Reporter", &t.reporter)?;
    pretty_kv(w, "Reason", &t.reason)?;
    if !t.resolved_by.is_empty() {
        pretty_kv(w, "Resolved by", &t.resolved_by)?;
    }

    writeln!(w)?;
    pretty_section(w, &format!("Comments ({})", out.comments.len()))?;
    if out.comments.is_empty() {
        writeln!(w, "(none)")?;
    }
    for c in &out.comments {
        writeln!(w, "[{}] {}", c.created_at, c.author)?;
        writeln!(w, "  {}", c.body)?;
    }
    Ok(())
}

pub fn run_show(args: &ShowArgs, output: OutputMode, project_root: &Path) -> anyhow::Result<()> {
    let workspace = Workspace::load(output, project_root)?;
    let conn = workspace.open_store(output)?;
    let ticket = cmd::require_ticket(output, &conn, args.id)?;
    let comments = query::get_comments(&conn, args.id)?;

    render_mode(
        output,
        &ShowOutput { ticket, comments },
        render_text,
        render_pretty,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ShowOutput {
        ShowOutput {
            ticket: Ticket {
                id: 7,
                floor: -1,
                office: "Archivo".into(),
                reporter: "Ana".into(),
                reason: "Humidity".into(),
                status: "resolved".into(),
                date: "05/03/24".into(),
                resolved_by: "Tomas, Chloe".into(),
            },
            comments: vec![Comment {
                id: 1,
                ticket_id: 7,
                body: "Dehumidifier installed".into(),
                author: "Chloe".into(),
                created_at: "05/03/24 10:15".into(),
            }],
        }
    }

    #[test]
    fn pretty_shows_label_and_comments() {
        let mut buf = Vec::new();
        render_pretty(&sample(), &mut buf).unwrap();
        let s = String::from_utf8(buf).unwrap();
        assert!(s.contains("Ticket #7"));
        assert!(s.contains("Resolved"));
        assert!(s.contains("Comments (1)"));
        assert!(s.contains("Dehumidifier installed"));
    }

    #[test]
    fn json_flattens_ticket_fields() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(value["id"], 7);
        assert_eq!(value["resolved_by"], "Tomas, Chloe");
        assert_eq!(value["comments"][0]["author"], "Chloe");
    }

    #[test]
    fn text_has_one_line_per_field() {
        let mut buf = Vec::new();
        render_text(&sample(), &mut buf).unwrap();
        let s = String::from_utf8(buf).unwrap();
        assert!(s.starts_with("id           7\n"));
        assert!(s.contains("comment      05/03/24 10:15  Chloe  Dehumidifier installed"));
    }
}
