/// Format error message by replacing {} placeholders with values
///
/// # Example
/// ```
/// use rplcore::diagnostics::format_message;
/// let msg = format_message("Cannot {} {} and {} values.", &["add", "Unit", "Symbol"]);
/// assert_eq!(msg, "Cannot add Unit and Symbol values.");
/// ```
pub fn format_message(template: &str, values: &[&str]) -> String {
    let mut result = template.to_string();
    for value in values {
        result = result.replacen("{}", value, 1);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::format_message;

    #[test]
    fn extra_placeholders_are_left_in_place() {
        assert_eq!(format_message("{} and {}", &["a"]), "a and {}");
    }
}
