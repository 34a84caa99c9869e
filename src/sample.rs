//! GPS sample stream: GPX/waypoint/CSV parsing into the normalized types the
//! rest of the crate works with.
//!
//! Parsing flattens all `<trk>/<trkseg>/<trkpt>` elements in document order
//! and deduplicates by `time`, keeping the last occurrence seen for any
//! given timestamp but preserving the position of its first occurrence —
//! matching the legacy `{point['time']: point for point in points}` idiom
//! this crate's results must stay compatible with.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::{AnalysisError, Result};
use crate::geo::Point;

/// A single timestamped GPS reading.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub lat: f64,
    pub lon: f64,
    pub elevation: Option<f64>,
    pub time: DateTime<Utc>,
    pub speed: Option<f64>,
}

fn parse_err(message: impl Into<String>) -> AnalysisError {
    AnalysisError::ParseError {
        source: "gpx".to_string(),
        message: message.into(),
        line: None,
    }
}

fn attr_f64(start: &BytesStart<'_>, name: &str) -> Result<f64> {
    for attr in start.attributes().flatten() {
        if attr.key.as_ref() == name.as_bytes() {
            let value = attr
                .unescape_value()
                .map_err(|e| parse_err(format!("invalid '{}' attribute: {}", name, e)))?;
            return value
                .parse::<f64>()
                .map_err(|e| parse_err(format!("'{}' is not a number: {}", name, e)));
        }
    }
    Err(parse_err(format!("missing required attribute '{}'", name)))
}

fn parse_time(text: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(text)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| parse_err(format!("invalid timestamp '{}': {}", text, e)))
}

/// Enforce `lat∈[-90,90]`, `lon∈[-180,180]` for the point at `sample_index`.
fn check_lat_lon(sample_index: usize, lat: f64, lon: f64) -> Result<()> {
    if !(-90.0..=90.0).contains(&lat) {
        return Err(AnalysisError::OutOfRangeError {
            sample_index,
            field: "lat".to_string(),
            value: lat,
        });
    }
    if !(-180.0..=180.0).contains(&lon) {
        return Err(AnalysisError::OutOfRangeError {
            sample_index,
            field: "lon".to_string(),
            value: lon,
        });
    }
    Ok(())
}

/// Parse a GPX document's track points into a deduplicated, time-ordered
/// sample stream.
pub fn parse_gpx(bytes: &[u8]) -> Result<Vec<Sample>> {
    let mut reader = Reader::from_reader(bytes);
    reader.config_mut().trim_text = true;
    let mut buf = Vec::new();

    #[derive(Clone, Copy, PartialEq)]
    enum Field {
        None,
        Ele,
        Time,
        Speed,
    }

    let mut samples: Vec<Sample> = Vec::new();
    let mut field = Field::None;
    let mut in_point = false;
    let mut lat: Option<f64> = None;
    let mut lon: Option<f64> = None;
    let mut ele: Option<f64> = None;
    let mut time: Option<DateTime<Utc>> = None;
    let mut speed: Option<f64> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) if e.name().as_ref() == b"trkpt" => {
                in_point = true;
                lat = Some(attr_f64(&e, "lat")?);
                lon = Some(attr_f64(&e, "lon")?);
                ele = None;
                time = None;
                speed = None;
            }
            Ok(Event::Start(e)) if in_point && e.name().as_ref() == b"ele" => {
                field = Field::Ele;
            }
            Ok(Event::Start(e)) if in_point && e.name().as_ref() == b"time" => {
                field = Field::Time;
            }
            Ok(Event::Start(e)) if in_point && e.name().as_ref() == b"speed" => {
                field = Field::Speed;
            }
            Ok(Event::Text(t)) if in_point && field != Field::None => {
                let text = t
                    .unescape()
                    .map_err(|e| parse_err(e.to_string()))?
                    .into_owned();
                match field {
                    Field::Ele => ele = text.trim().parse().ok(),
                    Field::Time => time = Some(parse_time(text.trim())?),
                    Field::Speed => speed = text.trim().parse().ok(),
                    Field::None => {}
                }
            }
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"ele" | b"time" | b"speed" => field = Field::None,
                b"trkpt" => {
                    in_point = false;
                    let sample = Sample {
                        lat: lat.take().ok_or_else(|| parse_err("missing lat"))?,
                        lon: lon.take().ok_or_else(|| parse_err("missing lon"))?,
                        elevation: ele.take(),
                        time: time.take().ok_or_else(|| parse_err("trkpt missing <time>"))?,
                        speed: speed.take(),
                    };
                    check_lat_lon(samples.len(), sample.lat, sample.lon)?;
                    samples.push(sample);
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(parse_err(e.to_string())),
            _ => {}
        }
        buf.clear();
    }

    Ok(dedup_by_time(samples))
}

/// Serialize a time-unique sample stream back into a minimal GPX document
/// that [`parse_gpx`] can read. Exists mainly to pin the parse/encode
/// round-trip in tests; not a general-purpose GPX writer.
pub fn samples_to_gpx(samples: &[Sample]) -> String {
    let mut out = String::from("<?xml version=\"1.0\"?>\n<gpx><trk><trkseg>\n");
    for sample in samples {
        out.push_str(&format!(
            "<trkpt lat=\"{}\" lon=\"{}\">",
            sample.lat, sample.lon
        ));
        if let Some(ele) = sample.elevation {
            out.push_str(&format!("<ele>{}</ele>", ele));
        }
        out.push_str(&format!(
            "<time>{}</time>",
            sample.time.to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
        ));
        if let Some(speed) = sample.speed {
            out.push_str(&format!("<speed>{}</speed>", speed));
        }
        out.push_str("</trkpt>\n");
    }
    out.push_str("</trkseg></trk></gpx>");
    out
}

/// Parse a GPX document's `<wpt>` elements into plain points, in document
/// order, corner-pair by corner-pair.
pub fn parse_waypoints(bytes: &[u8]) -> Result<Vec<Point>> {
    let mut reader = Reader::from_reader(bytes);
    reader.config_mut().trim_text = true;
    let mut buf = Vec::new();
    let mut points = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) if e.name().as_ref() == b"wpt" => {
                let lat = attr_f64(&e, "lat")?;
                let lon = attr_f64(&e, "lon")?;
                check_lat_lon(points.len(), lat, lon)?;
                points.push(Point::new(lat, lon));
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(parse_err(e.to_string())),
            _ => {}
        }
        buf.clear();
    }

    Ok(points)
}

/// Convert the legacy stop-zone CSV ingest (`id,lat1,long1,lat2,long2`, one
/// header row) into a flat, corner-pair-ordered list of points — the same
/// shape a GPX waypoint file of alternating corners would produce.
pub fn parse_stop_csv(bytes: &[u8]) -> Result<Vec<Point>> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| AnalysisError::ParseError {
            source: "stop-csv".to_string(),
            message: e.to_string(),
            line: None,
        })?;

    let mut points = Vec::new();
    for (line_no, line) in text.lines().enumerate().skip(1) {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split(',').collect();
        if fields.len() < 5 {
            return Err(AnalysisError::ParseError {
                source: "stop-csv".to_string(),
                message: format!("expected 5 columns, found {}", fields.len()),
                line: Some(line_no + 1),
            });
        }
        let parse_field = |field: &str| -> Result<f64> {
            field.trim().parse::<f64>().map_err(|e| AnalysisError::ParseError {
                source: "stop-csv".to_string(),
                message: e.to_string(),
                line: Some(line_no + 1),
            })
        };
        let lat1 = parse_field(fields[1])?;
        let lon1 = parse_field(fields[2])?;
        let lat2 = parse_field(fields[3])?;
        let lon2 = parse_field(fields[4])?;
        check_lat_lon(points.len(), lat1, lon1)?;
        check_lat_lon(points.len() + 1, lat2, lon2)?;
        points.push(Point::new(lat1, lon1));
        points.push(Point::new(lat2, lon2));
    }

    Ok(points)
}

fn dedup_by_time(samples: Vec<Sample>) -> Vec<Sample> {
    let mut order: Vec<DateTime<Utc>> = Vec::new();
    let mut last_by_time: HashMap<DateTime<Utc>, Sample> = HashMap::new();
    for sample in samples {
        if !last_by_time.contains_key(&sample.time) {
            order.push(sample.time);
        }
        last_by_time.insert(sample.time, sample);
    }
    order
        .into_iter()
        .map(|t| last_by_time.remove(&t).expect("time was just inserted"))
        .collect()
}
