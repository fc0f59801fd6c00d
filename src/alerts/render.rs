//! HTML rendering of alert emails

use super::config::{ParameterDefinition, PARAMETERS};

/// Placeholder shown for a parameter with no measured value
pub const MISSING_VALUE: &str = "—";

/// Classification of a single parameter reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowStatus {
    Normal,
    Abnormal,
}

impl RowStatus {
    pub fn label(self) -> &'static str {
        match self {
            RowStatus::Normal => "Normal",
            RowStatus::Abnormal => "Abnormal",
        }
    }

    fn color(self) -> &'static str {
        match self {
            RowStatus::Normal => "green",
            RowStatus::Abnormal => "red",
        }
    }
}

/// One parameter paired with its positional value
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterRow {
    pub parameter: ParameterDefinition,
    pub value: Option<f64>,
    pub status: RowStatus,
}

/// Pair every fixed parameter with the value at the same index.
/// Extra values are ignored; missing ones classify as abnormal.
pub fn classify(values: &[Option<f64>]) -> Vec<ParameterRow> {
    PARAMETERS
        .iter()
        .enumerate()
        .map(|(i, parameter)| {
            let value = values.get(i).copied().flatten();
            let status = if parameter.is_normal(value) {
                RowStatus::Normal
            } else {
                RowStatus::Abnormal
            };
            ParameterRow {
                parameter: *parameter,
                value,
                status,
            }
        })
        .collect()
}

/// Render the full alert body
pub fn render_alert_html(prediction: &str, values: &[Option<f64>]) -> String {
    let rows: String = classify(values).iter().map(render_row).collect();

    format!(
        r#"<h2 style="color:#dc2626">🚨 Eye Health Alert</h2>
<p><strong>Status:</strong> {status}</p>

<table border="1" cellpadding="8" cellspacing="0" width="100%" style="border-collapse:collapse">
  <thead style="background:#f3f4f6">
    <tr>
      <th align="left">Parameter</th>
      <th align="left">Measured Value</th>
      <th align="left">Normal Range</th>
      <th align="left">Status</th>
    </tr>
  </thead>
  <tbody>{rows}
  </tbody>
</table>

<p style="margin-top:12px">
  ⚠ Automated eye monitoring system detected abnormal metrics.<br/>
  Please recommend clinical evaluation.
</p>
"#,
        status = escape_html(prediction),
        rows = rows,
    )
}

fn render_row(row: &ParameterRow) -> String {
    let p = &row.parameter;
    let measured = match row.value {
        Some(v) => with_unit(&v.to_string(), p.unit),
        None => MISSING_VALUE.to_string(),
    };
    let range = with_unit(&format!("{} – {}", p.min, p.max), p.unit);

    format!(
        r#"
    <tr>
      <td>{name}</td>
      <td>{measured}</td>
      <td>{range}</td>
      <td style="color:{color}; font-weight:600">{label}</td>
    </tr>"#,
        name = p.name,
        measured = measured,
        range = range,
        color = row.status.color(),
        label = row.status.label(),
    )
}

fn with_unit(text: &str, unit: &str) -> String {
    if unit.is_empty() {
        text.to_string()
    } else {
        format!("{} {}", text, unit)
    }
}

fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn statuses(values: &[Option<f64>]) -> Vec<RowStatus> {
        classify(values).into_iter().map(|r| r.status).collect()
    }

    #[test]
    fn test_all_in_range() {
        let values: Vec<Option<f64>> = [34.0, 0.3, 20.0, 10.0, 97.0, 85.0, 75.0]
            .into_iter()
            .map(Some)
            .collect();
        assert!(statuses(&values).iter().all(|s| *s == RowStatus::Normal));
    }

    #[test]
    fn test_out_of_range_and_missing() {
        let values = vec![
            Some(40.0),
            None,
            Some(20.0),
            Some(10.0),
            Some(97.0),
            Some(85.0),
            Some(75.0),
        ];
        let got = statuses(&values);
        assert_eq!(got[0], RowStatus::Abnormal);
        assert_eq!(got[1], RowStatus::Abnormal);
        assert!(got[2..].iter().all(|s| *s == RowStatus::Normal));
    }

    #[test]
    fn test_short_and_long_sequences() {
        let rows = classify(&[Some(34.0)]);
        assert_eq!(rows.len(), 7);
        assert_eq!(rows[0].status, RowStatus::Normal);
        assert!(rows[1..].iter().all(|r| r.value.is_none()));

        let long = vec![Some(34.0); 10];
        assert_eq!(classify(&long).len(), 7);
    }

    #[test]
    fn test_html_contents() {
        let html = render_alert_html("Abnormal", &[Some(40.0), None]);
        assert!(html.contains("<strong>Status:</strong> Abnormal"));
        assert!(html.contains("<td>40 °C</td>"));
        assert!(html.contains("<td>33 – 36 °C</td>"));
        assert!(html.contains("<td>—</td>"));
        assert!(html.contains("<td>0 – 1.5</td>"));
        assert!(html.contains("Please recommend clinical evaluation."));
        assert_eq!(html.matches("<tr>").count(), 8);
        assert_eq!(html.matches("color:red").count(), 7);
    }

    #[test]
    fn test_row_order_follows_table() {
        let html = render_alert_html("Abnormal", &[]);
        let mut last = 0;
        for p in PARAMETERS.iter() {
            let pos = html.find(p.name).unwrap();
            assert!(pos > last);
            last = pos;
        }
    }

    #[test]
    fn test_prediction_is_escaped() {
        let html = render_alert_html("<b>Abnormal</b>", &[]);
        assert!(html.contains("&lt;b&gt;Abnormal&lt;/b&gt;"));
    }
}
