// Shared prompt-building utilities.
// Each feature that calls the gateway defines its own prompts.rs alongside it.

/// Separator placed between the system instructions and the caller's content.
pub const USER_INPUT_HEADER: &str = "User Input:";

/// The gateway sends a single combined prompt: instructions first, user content after.
pub fn combine_prompt(system_prompt: &str, user_prompt: &str) -> String {
    format!("{system_prompt}\n\n{USER_INPUT_HEADER}\n{user_prompt}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combine_prompt_layout() {
        assert_eq!(
            combine_prompt("Be brief.", "I write Rust."),
            "Be brief.\n\nUser Input:\nI write Rust."
        );
    }
}
