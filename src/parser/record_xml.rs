//! Low-level XML walk over event fragments.
//!
//! Both input formats use the Windows event namespace
//! (`http://schemas.microsoft.com/win/2004/08/events/event`): an exported
//! event-log record is a single `Event` element, a request-trace document
//! is an ordered sequence of them. This module extracts the raw fields of
//! every `Event` element in a document; higher layers normalize them.

use crate::utils::error::ParseError;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// Raw fields of one `Event` element, prior to normalization.
#[derive(Debug, Clone, Default)]
pub struct RawRecord {
    pub event_id: String,
    pub record_number: String,
    pub provider: String,
    pub level: String,
    pub channel: String,
    pub computer: String,
    /// `TimeCreated@SystemTime`, verbatim
    pub system_time: String,
    /// `RenderingInfo/Opcode` text, when present
    pub opcode: Option<String>,
    /// `EventData/Data` children in document order: (Name, joined text)
    pub data: Vec<(String, String)>,
    /// The original `Event` fragment, retained for re-rendering
    pub raw: String,
}

/// Extract every `Event` element of a document, in document order.
///
/// Malformed XML is a fatal error; the caller decides whether that aborts
/// a whole job (request traces) or just one record (event-log containers).
pub fn parse_event_elements(xml: &str) -> Result<Vec<RawRecord>, ParseError> {
    let mut reader = Reader::from_str(xml);
    let mut records = Vec::new();

    let mut path: Vec<String> = Vec::new();
    let mut current: Option<RawRecord> = None;
    let mut event_start = 0usize;
    // Text accumulator for the <Data> element currently open, if any
    let mut data_name: Option<String> = None;
    let mut data_text: Vec<String> = Vec::new();

    loop {
        let pos_before = reader.buffer_position();
        match reader.read_event()? {
            Event::Start(e) => {
                let name = local_name(&e);
                if name == "Event" && current.is_none() {
                    current = Some(RawRecord::default());
                    event_start = pos_before;
                }
                if let Some(rec) = current.as_mut() {
                    start_element(rec, &e, &name, &path, &mut data_name, &mut data_text);
                }
                path.push(name);
            }
            Event::Empty(e) => {
                let name = local_name(&e);
                if let Some(rec) = current.as_mut() {
                    // Self-closing elements carry attributes but no text
                    match name.as_str() {
                        "Provider" => {
                            if let Some(v) = attr_value(&e, "Name") {
                                rec.provider = v;
                            }
                        }
                        "TimeCreated" => {
                            if let Some(v) = attr_value(&e, "SystemTime") {
                                rec.system_time = v;
                            }
                        }
                        "Data" if path.last().is_some_and(|p| p.as_str() == "EventData") => {
                            let key = attr_value(&e, "Name").unwrap_or_else(|| "Unnamed".into());
                            rec.data.push((key, String::new()));
                        }
                        _ => {}
                    }
                }
            }
            Event::Text(t) => {
                let text = t.unescape()?.trim().to_string();
                if text.is_empty() {
                    continue;
                }
                if let Some(rec) = current.as_mut() {
                    if data_name.is_some() {
                        data_text.push(text);
                    } else {
                        capture_text(rec, &path, text);
                    }
                }
            }
            Event::End(e) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                path.pop();
                if let Some(rec) = current.as_mut() {
                    if name == "Data" {
                        if let Some(key) = data_name.take() {
                            rec.data.push((key, data_text.join(" ")));
                            data_text.clear();
                        }
                    }
                }
                if name == "Event" && path.iter().all(|p| p.as_str() != "Event") {
                    if let Some(mut rec) = current.take() {
                        let end = reader.buffer_position();
                        rec.raw = xml
                            .get(event_start..end)
                            .unwrap_or_default()
                            .trim()
                            .to_string();
                        records.push(rec);
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(records)
}

/// Parse a single exported record fragment (one `Event` element).
pub fn parse_record_fragment(xml: &str) -> Result<RawRecord, ParseError> {
    parse_event_elements(xml)?
        .into_iter()
        .next()
        .ok_or(ParseError::NoEvents)
}

fn start_element(
    rec: &mut RawRecord,
    e: &BytesStart<'_>,
    name: &str,
    path: &[String],
    data_name: &mut Option<String>,
    data_text: &mut Vec<String>,
) {
    match name {
        "Provider" => {
            if let Some(v) = attr_value(e, "Name") {
                rec.provider = v;
            }
        }
        "TimeCreated" => {
            if let Some(v) = attr_value(e, "SystemTime") {
                rec.system_time = v;
            }
        }
        "Data" if path.last().is_some_and(|p| p.as_str() == "EventData") => {
            *data_name = Some(attr_value(e, "Name").unwrap_or_else(|| "Unnamed".into()));
            data_text.clear();
        }
        _ => {}
    }
}

/// Capture the text of System / RenderingInfo children.
fn capture_text(rec: &mut RawRecord, path: &[String], text: String) {
    let (parent, element) = match path.len() {
        0 | 1 => return,
        n => (path[n - 2].as_str(), path[n - 1].as_str()),
    };
    match (parent, element) {
        ("System", "EventID") => rec.event_id = text,
        ("System", "EventRecordID") => rec.record_number = text,
        ("System", "Level") => rec.level = text,
        ("System", "Channel") => rec.channel = text,
        ("System", "Computer") => rec.computer = text,
        ("RenderingInfo", "Opcode") => rec.opcode = Some(text),
        _ => {}
    }
}

fn local_name(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.local_name().as_ref()).into_owned()
}

fn attr_value(e: &BytesStart<'_>, name: &str) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.local_name().as_ref() == name.as_bytes())
        .and_then(|a| a.unescape_value().ok().map(|v| v.into_owned()))
}
