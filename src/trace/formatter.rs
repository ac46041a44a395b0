use crate::operation::CompiledOperation;
use crate::validation::ValidationResult;
use itertools::Itertools;

/// Formats validation verdicts and compiled plans into human-readable strings
pub struct PlanFormatter;

impl PlanFormatter {
    /// One-line summary of a plan as comma separated `op(label)` entries.
    pub fn summary(operations: &[CompiledOperation]) -> String {
        operations.iter().join(",")
    }

    /// Multi-line listing of a plan, one numbered step per line with all of
    /// its engine parameters.
    pub fn render_plan(operations: &[CompiledOperation]) -> String {
        if operations.is_empty() {
            return "(no operations)".to_string();
        }
        operations
            .iter()
            .enumerate()
            .map(|(i, op)| {
                let params = op
                    .parameter_map()
                    .iter()
                    .map(|(k, v)| format!("{}={}", k, v))
                    .join(", ");
                format!("{:>2}. {} [node {}] {{{}}}", i + 1, op.op, op.node_id, params)
            })
            .join("\n")
    }

    /// Describes a validation verdict, including the discovered path or the
    /// guidance for fixing the flow.
    pub fn describe_validation(result: &ValidationResult) -> String {
        match result.reason {
            None => format!("valid: {}", result.path.iter().join(" -> ")),
            Some(reason) => format!("invalid ({}): {}", reason, reason.guidance()),
        }
    }
}
