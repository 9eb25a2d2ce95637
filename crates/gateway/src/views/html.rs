//! Printable pages: the registration list and cut-out name tags.

use chrono::{DateTime, Utc};

use domain::{Registration, NAME_TAG_NOTE_LIMIT, PROGRAM_NAME};

use super::{note_or_none, short_date};

const PRINT_STYLE: &str = "\
body { font-family: sans-serif; margin: 0.5in; color: #1f2937; }
h1 { color: #166534; margin-bottom: 0.25rem; }
table { width: 100%; border-collapse: collapse; }
th, td { border: 1px solid #d1d5db; padding: 0.5rem; text-align: left; vertical-align: top; }
tbody tr:nth-child(odd) { background: #f9fafb; }
.muted { color: #6b7280; font-size: 0.875rem; }
.tags { display: grid; grid-template-columns: repeat(2, 1fr); gap: 1rem; }
.tag { border: 2px dashed #9ca3af; border-radius: 0.5rem; padding: 1rem; background: #f0fdf4; page-break-inside: avoid; }
.tag .program { color: #15803d; font-size: 0.75rem; }
.tag .children { color: #166534; font-size: 1.5rem; font-weight: bold; }
.attention { background: #fef9c3; border: 1px solid #fde047; padding: 0.5rem; margin: 0.5rem 0; }
@page { margin: 0.5in; }
";

/// Minimal HTML escaping for text and attribute content.
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Shorten a note for a name tag, counting characters rather than bytes.
pub fn truncate_note(note: &str) -> String {
    if note.chars().count() > NAME_TAG_NOTE_LIMIT {
        let head: String = note.chars().take(NAME_TAG_NOTE_LIMIT).collect();
        format!("{}...", head)
    } else {
        note.to_string()
    }
}

fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{}</title>\n<style>\n{}</style>\n</head>\n<body>\n{}</body>\n</html>\n",
        escape(title),
        PRINT_STYLE,
        body
    )
}

/// Registration list for printing, one table row per registration.
pub fn print_list(registrations: &[Registration], generated_at: DateTime<Utc>) -> String {
    let mut body = format!(
        "<header>\n<h1>{} Program</h1>\n<h2>Registration List</h2>\n\
         <p class=\"muted\">Total registrations: {} | Generated {}</p>\n</header>\n",
        PROGRAM_NAME,
        registrations.len(),
        short_date(&generated_at)
    );

    body.push_str(
        "<table>\n<thead>\n<tr><th>Children Names &amp; Ages</th><th>Parent Name &amp; Contact</th>\
         <th>Emergency Contact</th><th>Special Notes</th></tr>\n</thead>\n<tbody>\n",
    );

    for registration in registrations {
        body.push_str(&format!(
            "<tr>\n<td><strong>{}</strong><div class=\"muted\">Ages: {}</div></td>\n\
             <td><strong>{}</strong><div class=\"muted\">{}</div><div class=\"muted\">{}</div></td>\n\
             <td><strong>{}</strong><div class=\"muted\">{}</div></td>\n<td>{}</td>\n</tr>\n",
            escape(&registration.child_names),
            escape(&registration.child_ages),
            escape(&registration.parent_name),
            escape(&registration.parent_phone),
            escape(&registration.parent_email),
            escape(&registration.emergency_contact_name),
            escape(&registration.emergency_contact_phone),
            special_notes(registration),
        ));
    }

    body.push_str("</tbody>\n</table>\n");
    page(&format!("{} Registration List", PROGRAM_NAME), &body)
}

fn special_notes(registration: &Registration) -> String {
    if !registration.has_notes() {
        return format!("<span class=\"muted\">{}</span>", note_or_none(""));
    }

    let mut notes = String::new();
    if !registration.allergies.is_empty() {
        notes.push_str(&format!(
            "<div><strong>Allergies:</strong> {}</div>",
            escape(&registration.allergies)
        ));
    }
    if !registration.neurodivergencies.is_empty() {
        notes.push_str(&format!(
            "<div><strong>Special Needs:</strong> {}</div>",
            escape(&registration.neurodivergencies)
        ));
    }
    notes
}

/// Name tags for children who have not been checked in yet.
pub fn name_tags(registrations: &[Registration], generated_at: DateTime<Utc>) -> String {
    let mut body = format!(
        "<header>\n<h1>{} Name Tags</h1>\n<p class=\"muted\">Cut along dotted lines</p>\n</header>\n\
         <section class=\"tags\">\n",
        PROGRAM_NAME
    );

    for registration in registrations.iter().filter(|r| !r.checked_in) {
        body.push_str(&format!(
            "<div class=\"tag\">\n<div class=\"program\">{}</div>\n\
             <div class=\"children\">{}</div>\n<div class=\"muted\">Ages: {}</div>\n",
            PROGRAM_NAME.to_uppercase(),
            escape(&registration.child_names),
            escape(&registration.child_ages),
        ));

        if registration.has_notes() {
            body.push_str("<div class=\"attention\">\n<strong>SPECIAL ATTENTION</strong>\n");
            if !registration.allergies.is_empty() {
                body.push_str(&format!(
                    "<div><strong>Allergies:</strong> {}</div>\n",
                    escape(&truncate_note(&registration.allergies))
                ));
            }
            if !registration.neurodivergencies.is_empty() {
                body.push_str(&format!(
                    "<div><strong>Special Needs:</strong> {}</div>\n",
                    escape(&truncate_note(&registration.neurodivergencies))
                ));
            }
            body.push_str("</div>\n");
        }

        body.push_str(&format!(
            "<div class=\"muted\">\n<div>Parent: {}</div>\n<div>Emergency: {}</div>\n<div>{}</div>\n</div>\n</div>\n",
            escape(&registration.parent_name),
            escape(&registration.emergency_contact_name),
            escape(&registration.emergency_contact_phone),
        ));
    }

    body.push_str(&format!(
        "</section>\n<footer class=\"muted\">Generated on {} | {} Children&#39;s Program</footer>\n",
        short_date(&generated_at),
        PROGRAM_NAME
    ));

    page(&format!("{} Name Tags", PROGRAM_NAME), &body)
}
