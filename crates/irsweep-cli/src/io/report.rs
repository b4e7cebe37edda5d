// crates/irsweep-cli/src/io/report.rs
//
// Ranked results as CSV (one row per record, all files in one table) and
// JSONL (one object per record).

use std::fmt::Write as _;

use anyhow::Context;
use irsweep_core::search::Outcome;
use irsweep_core::ScoreRecord;

pub const CSV_HEADER: &str = "file,rank,id,score,outcome,bits_consumed,slack_bytes,frame_crc,\
h_grad,v_grad,row_mean_var,std_dev,saturation,chi2,imbalance,bytes_used,hypothesis";

fn outcome_tag(o: &Outcome) -> &'static str {
    match o {
        Outcome::Complete { .. } => "complete",
        Outcome::Failed(f) => f.tag(),
    }
}

fn opt(v: Option<f64>) -> String {
    v.map(|x| format!("{x:.6}")).unwrap_or_default()
}

/// RFC 4180 quoting for fields that contain a separator, quote or newline.
fn csv_field(s: &str) -> String {
    if s.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

pub fn csv_row(file: &str, rank: usize, r: &ScoreRecord) -> String {
    let (bits, slack, crc) = match r.outcome {
        Outcome::Complete {
            bits_consumed,
            slack_bytes,
            frame_crc,
        } => (bits_consumed.to_string(), slack_bytes.to_string(), format!("{frame_crc:08x}")),
        Outcome::Failed(f) => (f.bit().map(|b| b.to_string()).unwrap_or_default(), String::new(), String::new()),
    };
    let m = r.metrics;
    format!(
        "{},{},{},{:.6},{},{},{},{},{},{},{},{},{},{},{},{},{}",
        csv_field(file),
        rank,
        r.hypothesis.id_hex(),
        r.score,
        outcome_tag(&r.outcome),
        bits,
        slack,
        crc,
        opt(m.map(|m| m.h_grad)),
        opt(m.map(|m| m.v_grad)),
        opt(m.map(|m| m.row_mean_var)),
        opt(m.map(|m| m.std_dev)),
        opt(m.map(|m| m.saturation)),
        opt(m.and_then(|m| m.chi2)),
        opt(m.map(|m| m.imbalance)),
        m.map(|m| m.bytes_used.to_string()).unwrap_or_default(),
        r.hypothesis
    )
}

fn json_str(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            c if (c as u32) < 0x20 => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

fn json_num(v: Option<f64>) -> String {
    v.map(|x| format!("{x}")).unwrap_or_else(|| "null".to_string())
}

pub fn jsonl_line(file: &str, rank: usize, r: &ScoreRecord) -> String {
    let mut s = format!(
        "{{\"file\":{},\"rank\":{},\"id\":\"{}\",\"hypothesis\":{},\"score\":{},\"outcome\":\"{}\"",
        json_str(file),
        rank,
        r.hypothesis.id_hex(),
        json_str(&r.hypothesis.to_string()),
        r.score,
        outcome_tag(&r.outcome)
    );
    match r.outcome {
        Outcome::Complete {
            bits_consumed,
            slack_bytes,
            frame_crc,
        } => {
            let _ = write!(
                s,
                ",\"bits_consumed\":{bits_consumed},\"slack_bytes\":{slack_bytes},\"frame_crc\":\"{frame_crc:08x}\""
            );
        }
        Outcome::Failed(f) => {
            let _ = write!(s, ",\"failed_at_bit\":{}", json_num(f.bit().map(|b| b as f64)));
        }
    }
    if let Some(m) = r.metrics {
        let _ = write!(
            s,
            ",\"h_grad\":{},\"v_grad\":{},\"row_mean_var\":{},\"std_dev\":{},\"saturation\":{},\"chi2\":{},\"imbalance\":{},\"bytes_used\":{}",
            m.h_grad,
            m.v_grad,
            m.row_mean_var,
            m.std_dev,
            m.saturation,
            json_num(m.chi2),
            m.imbalance,
            m.bytes_used
        );
    }
    s.push('}');
    s
}

/// Accumulates report lines across input files, then writes them once.
#[derive(Default)]
pub struct ReportSink {
    csv: Vec<String>,
    jsonl: Vec<String>,
}

impl ReportSink {
    pub fn add(&mut self, file: &str, records: &[ScoreRecord]) {
        for (i, r) in records.iter().enumerate() {
            self.csv.push(csv_row(file, i + 1, r));
            self.jsonl.push(jsonl_line(file, i + 1, r));
        }
    }

    pub fn write_csv(&self, path: &str) -> anyhow::Result<()> {
        let mut s = String::from(CSV_HEADER);
        s.push('\n');
        for line in &self.csv {
            s.push_str(line);
            s.push('\n');
        }
        std::fs::write(path, s).with_context(|| format!("write csv report: {path}"))?;
        Ok(())
    }

    pub fn write_jsonl(&self, path: &str) -> anyhow::Result<()> {
        let mut s = String::new();
        for line in &self.jsonl {
            s.push_str(line);
            s.push('\n');
        }
        std::fs::write(path, s).with_context(|| format!("write jsonl report: {path}"))?;
        Ok(())
    }
}
