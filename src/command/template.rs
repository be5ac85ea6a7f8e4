use std::collections::HashMap;

/// One fragment of a rendered `aws` command line. Templates are ordered
/// lists of pieces; rendering walks them left to right and skips pieces
/// whose parameter resolved to nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Piece {
    /// Verbatim text, e.g. a fixed `--query` expression.
    Lit(&'static str),
    /// The bare value of a parameter.
    Value { param: &'static str },
    /// `--flag <value>` for a text parameter.
    Flagged {
        flag: &'static str,
        param: &'static str,
    },
    /// `--flag` emitted only when a boolean parameter is true.
    Switch {
        flag: &'static str,
        param: &'static str,
    },
    /// `--flag v1 v2 ...` for a list parameter, skipped when empty.
    Repeated {
        flag: &'static str,
        param: &'static str,
    },
}

/// A resolved parameter value, produced by the dispatcher from flags,
/// positionals and defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    Text(String),
    List(Vec<String>),
    Toggle(bool),
}

impl ParamValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ParamValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// True when the value carries nothing worth rendering.
    pub fn is_empty(&self) -> bool {
        match self {
            ParamValue::Text(s) => s.is_empty(),
            ParamValue::List(items) => items.is_empty(),
            ParamValue::Toggle(on) => !*on,
        }
    }
}

/// Render `aws <service> <operation> ...` from a template and the resolved
/// parameter values. Pieces that reference an absent or empty parameter are
/// dropped; `json_output` appends `--output json` so the caller gets
/// machine-readable output regardless of the local AWS CLI configuration.
pub fn render(
    aws_service: &str,
    aws_operation: &str,
    template: &[Piece],
    values: &HashMap<&'static str, ParamValue>,
    json_output: bool,
) -> String {
    let mut parts = vec!["aws".to_string(), aws_service.to_string(), aws_operation.to_string()];

    for piece in template {
        match piece {
            Piece::Lit(text) => parts.push((*text).to_string()),
            Piece::Value { param } => {
                if let Some(ParamValue::Text(value)) = values.get(param) {
                    if !value.is_empty() {
                        parts.push(value.clone());
                    }
                }
            }
            Piece::Flagged { flag, param } => {
                if let Some(ParamValue::Text(value)) = values.get(param) {
                    if !value.is_empty() {
                        parts.push((*flag).to_string());
                        parts.push(value.clone());
                    }
                }
            }
            Piece::Switch { flag, param } => {
                if let Some(ParamValue::Toggle(true)) = values.get(param) {
                    parts.push((*flag).to_string());
                }
            }
            Piece::Repeated { flag, param } => {
                if let Some(ParamValue::List(items)) = values.get(param) {
                    if !items.is_empty() {
                        parts.push((*flag).to_string());
                        parts.extend(items.iter().cloned());
                    }
                }
            }
        }
    }

    if json_output {
        parts.push("--output".to_string());
        parts.push("json".to_string());
    }

    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(entries: &[(&'static str, ParamValue)]) -> HashMap<&'static str, ParamValue> {
        entries.iter().cloned().collect()
    }

    #[test]
    fn test_renders_flagged_values_in_template_order() {
        let template = [
            Piece::Flagged {
                flag: "--name",
                param: "cluster",
            },
            Piece::Flagged {
                flag: "--region",
                param: "region",
            },
        ];
        let rendered = render(
            "eks",
            "update-kubeconfig",
            &template,
            &values(&[
                ("cluster", ParamValue::Text("main".into())),
                ("region", ParamValue::Text("us-east-1".into())),
            ]),
            true,
        );
        assert_eq!(
            rendered,
            "aws eks update-kubeconfig --name main --region us-east-1 --output json"
        );
    }

    #[test]
    fn test_skips_absent_and_empty_parameters() {
        let template = [
            Piece::Value { param: "path" },
            Piece::Flagged {
                flag: "--region",
                param: "region",
            },
        ];
        let rendered = render(
            "s3",
            "ls",
            &template,
            &values(&[("region", ParamValue::Text("us-east-1".into()))]),
            false,
        );
        assert_eq!(rendered, "aws s3 ls --region us-east-1");
    }

    #[test]
    fn test_switch_renders_only_when_true() {
        let template = [Piece::Switch {
            flag: "--follow",
            param: "follow",
        }];
        let on = render(
            "logs",
            "tail",
            &template,
            &values(&[("follow", ParamValue::Toggle(true))]),
            false,
        );
        let off = render(
            "logs",
            "tail",
            &template,
            &values(&[("follow", ParamValue::Toggle(false))]),
            false,
        );
        assert_eq!(on, "aws logs tail --follow");
        assert_eq!(off, "aws logs tail");
    }

    #[test]
    fn test_repeated_spreads_list_items() {
        let template = [Piece::Repeated {
            flag: "--filters",
            param: "filters",
        }];
        let rendered = render(
            "ec2",
            "describe-instances",
            &template,
            &values(&[(
                "filters",
                ParamValue::List(vec!["Name=a,Values=b".into(), "Name=c,Values=d".into()]),
            )]),
            false,
        );
        assert_eq!(
            rendered,
            "aws ec2 describe-instances --filters Name=a,Values=b Name=c,Values=d"
        );
    }

    #[test]
    fn test_literals_pass_through_untouched() {
        let template = [Piece::Lit("--query 'Vpcs[].VpcId' --output table")];
        let rendered = render("ec2", "describe-vpcs", &template, &HashMap::new(), false);
        assert_eq!(
            rendered,
            "aws ec2 describe-vpcs --query 'Vpcs[].VpcId' --output table"
        );
    }
}
