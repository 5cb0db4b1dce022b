//! Configured value-expression rewriting.
//!
//! Rules arrive as `trigger:trigger_value:engine=template` strings. Exactly
//! one chain applies to a given field: its field-name chain if any rule
//! matches, else its type chain, else the unconditional chain. Within the
//! chosen chain every rule applies in configured order, each feeding the
//! next.

use crate::error::GenError;

const ENGINE_FMT: &str = "fmt";

#[derive(Debug, Default)]
pub struct CodeRewriter {
    field_rules: Vec<(String, String)>,
    type_rules: Vec<(String, String)>,
    all_rules: Vec<String>,
}

impl CodeRewriter {
    /// Parses rule strings. The only engine is `fmt`, whose template
    /// substitutes the incoming expression for every `{}`.
    pub fn parse(rules: &[String]) -> Result<Self, GenError> {
        let mut rewriter = Self::default();
        for rule in rules {
            let bad = |reason: &str| GenError::BadRewriteRule {
                rule: rule.clone(),
                reason: reason.to_string(),
            };

            let mut parts = rule.splitn(3, ':');
            let (Some(trigger), Some(trigger_value), Some(engine_part)) =
                (parts.next(), parts.next(), parts.next())
            else {
                return Err(bad("expected `trigger:trigger_value:engine=template`"));
            };
            let Some((engine, template)) = engine_part.split_once('=') else {
                return Err(bad("expected `engine=template` after the trigger"));
            };
            if engine != ENGINE_FMT {
                return Err(bad("unknown engine, expected `fmt`"));
            }

            match trigger {
                "" if trigger_value.is_empty() => rewriter.all_rules.push(template.to_string()),
                "" => return Err(bad("an empty trigger takes no trigger value")),
                "field" => rewriter
                    .field_rules
                    .push((trigger_value.to_string(), template.to_string())),
                "type" => rewriter
                    .type_rules
                    .push((trigger_value.to_string(), template.to_string())),
                _ => return Err(bad("unknown trigger, expected `field`, `type` or empty")),
            }
        }
        Ok(rewriter)
    }

    pub fn is_empty(&self) -> bool {
        self.field_rules.is_empty() && self.type_rules.is_empty() && self.all_rules.is_empty()
    }

    /// Applies the matching chain to `expr`. The flag reports whether any
    /// rule changed the text (diagnostics only).
    pub fn transform(&self, field_name: &str, type_name: &str, expr: &str) -> (String, bool) {
        let field_chain: Vec<&str> = self
            .field_rules
            .iter()
            .filter(|(name, _)| name == field_name)
            .map(|(_, template)| template.as_str())
            .collect();
        let chain: Vec<&str> = if !field_chain.is_empty() {
            field_chain
        } else {
            let type_chain: Vec<&str> = self
                .type_rules
                .iter()
                .filter(|(name, _)| name == type_name)
                .map(|(_, template)| template.as_str())
                .collect();
            if !type_chain.is_empty() {
                type_chain
            } else {
                self.all_rules.iter().map(String::as_str).collect()
            }
        };

        let mut out = expr.to_string();
        let mut changed = false;
        for template in chain {
            let next = template.replace("{}", &out);
            if next != out {
                changed = true;
            }
            out = next;
        }
        (out, changed)
    }
}
