use super::types::OpDef;

/// Display label for report lines: the explicit instance name if set, else
/// the first output name, else a placeholder.
pub fn display_label(def: &OpDef) -> &str {
    match &def.name {
        Some(name) if !name.is_empty() => name,
        _ => def
            .outputs
            .first()
            .map(String::as_str)
            .unwrap_or("<no_output>"),
    }
}

/// One-line description of an op node for trace output.
pub fn describe_op(def: &OpDef) -> String {
    format!(
        "{}({}) >> {}",
        def.op_type,
        def.inputs.join(","),
        def.outputs.join(",")
    )
}
