const OUTPUT_START: &str = "P4 OUTPUT START";
const OUTPUT_END: &str = "P4 OUTPUT END";
const RULE_WIDTH: usize = 80;

fn rule(title: &str) -> String {
    format!("{:-^width$}", format!(" {title} "), width = RULE_WIDTH)
}

/// Command line followed by its output between ruled markers.
pub fn format_command_output(command: &str, output: &str) -> String {
    [
        command.to_string(),
        rule(OUTPUT_START),
        output.to_string(),
        rule(OUTPUT_END),
    ]
    .join("\n")
}
