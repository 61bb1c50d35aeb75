//! CSV export. Seventeen fixed columns, comma separated, RFC-style quoting
//! triggered by commas, quotes, newlines or semicolons.

use caseforge_engine::types::TestCase;

const HEADER: [&str; 17] = [
    "id",
    "title",
    "caseType",
    "priority",
    "severity",
    "techniques",
    "preconditions",
    "dataUsed",
    "steps",
    "expected",
    "justification",
    "riskCovered",
    "riskCategory",
    "observations",
    "logicalHash",
    "rationale",
    "risks",
];

fn csv_escape(value: &str) -> String {
    if value.contains(['"', ',', '\n', '\r', ';']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Render the cases as a CSV document. Row order follows the input; the
/// caller is expected to pass cases already in export order.
#[must_use]
pub fn to_csv(cases: &[TestCase]) -> String {
    let mut lines = Vec::with_capacity(cases.len() + 1);
    lines.push(HEADER.join(","));

    for c in cases {
        let steps = c.steps.join(" | ");
        let risks = c.risks.join(" | ");
        let data_used = c
            .data_used
            .iter()
            .map(|(k, v)| format!("{k}={}", v.render()))
            .collect::<Vec<_>>()
            .join(" | ");
        let techniques = c
            .techniques
            .iter()
            .map(|t| t.as_str())
            .collect::<Vec<_>>()
            .join("+");
        let fields = [
            c.id.as_str(),
            c.title.as_str(),
            c.case_type.as_str(),
            c.priority.as_str(),
            c.severity.as_str(),
            techniques.as_str(),
            c.preconditions.as_str(),
            data_used.as_str(),
            steps.as_str(),
            c.expected.as_str(),
            c.justification.as_str(),
            c.risk_covered.as_str(),
            c.risk_category.as_str(),
            c.observations.as_str(),
            c.logical_hash.as_str(),
            &c.rationale.join(" | "),
            risks.as_str(),
        ];
        lines.push(
            fields
                .iter()
                .map(|f| csv_escape(f))
                .collect::<Vec<_>>()
                .join(","),
        );
    }

    lines.join("\n")
}

/// Re-parse a document produced by [`to_csv`] into rows of fields (header
/// row included). Understands quoted fields with doubled quotes and
/// embedded commas or newlines; used to check the export round-trips.
#[must_use]
pub fn parse_csv_export(input: &str) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '"' {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            } else {
                field.push(c);
            }
            continue;
        }
        match c {
            '"' => in_quotes = true,
            ',' => row.push(std::mem::take(&mut field)),
            '\n' => {
                row.push(std::mem::take(&mut field));
                rows.push(std::mem::take(&mut row));
            }
            '\r' => {}
            _ => field.push(c),
        }
    }
    if !field.is_empty() || !row.is_empty() {
        row.push(field);
        rows.push(row);
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use caseforge_engine::merge_cases;
    use caseforge_engine::types::{CaseType, DataMap, DataValue, DraftCase};
    use pretty_assertions::assert_eq;

    fn case(title: &str) -> TestCase {
        let mut data = DataMap::new();
        data.insert("value".into(), DataValue::Number(10.0));
        data.insert("campo".into(), DataValue::Null);
        let draft = DraftCase::new("fp-csv", title, CaseType::Positivo)
            .steps(vec!["Abrir a tela".into(), "Informar o valor".into()])
            .expected("Sistema aceita")
            .data_used(data);
        merge_cases(vec![draft]).remove(0)
    }

    #[test]
    fn test_header_row() {
        let csv = to_csv(&[]);
        assert_eq!(
            csv,
            "id,title,caseType,priority,severity,techniques,preconditions,dataUsed,steps,\
             expected,justification,riskCovered,riskCategory,observations,logicalHash,\
             rationale,risks"
        );
    }

    #[test]
    fn test_joined_collections_and_null_rendering() {
        let csv = to_csv(&[case("Valor aceito")]);
        let row = csv.lines().nth(1).unwrap();
        assert!(row.contains("Abrir a tela | Informar o valor"));
        assert!(row.contains("value=10 | campo=(nulo)"));
    }

    #[test]
    fn test_quoting() {
        assert_eq!(csv_escape("simples"), "simples");
        assert_eq!(csv_escape("a,b"), "\"a,b\"");
        assert_eq!(csv_escape("a;b"), "\"a;b\"");
        assert_eq!(csv_escape("diz \"oi\""), "\"diz \"\"oi\"\"\"");
        assert_eq!(csv_escape("linha\nquebrada"), "\"linha\nquebrada\"");
    }

    #[test]
    fn test_title_with_comma_round_trips_quoted() {
        let csv = to_csv(&[case("Valor, com vírgula")]);
        let row = csv.lines().nth(1).unwrap();
        assert!(row.contains("\"Valor, com vírgula\""));
    }

    #[test]
    fn test_round_trip_recovers_identity_columns() {
        let original = case("Valor, com \"aspas\"\ne quebra");
        let csv = to_csv(std::slice::from_ref(&original));
        let rows = parse_csv_export(&csv);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].len(), 17);
        let row = &rows[1];
        assert_eq!(row[0], original.id);
        assert_eq!(row[1], original.title);
        assert_eq!(row[2], original.case_type.as_str());
        assert_eq!(row[3], original.priority.as_str());
        assert_eq!(row[4], original.severity.as_str());
        assert_eq!(row[14], original.logical_hash);
    }
}
