/// Helper functions to format Discord messages with Markdown safely.
#[allow(dead_code)]
pub mod discord {

    use poise::serenity_prelude::utils::MessageBuilder;
    use poise::serenity_prelude::UserId;

    /// Formats a raw Discord user mention (`<@id>`).
    pub fn mention(id: impl Into<i64>) -> String {
        build(|builder| {
            let user_id = UserId::new(id.into() as u64);
            builder.mention(&user_id);
        })
    }

    /// Wraps text with Discord's inline bold formatting (`**text**`).
    pub fn bold(text: impl AsRef<str>) -> String {
        build(|builder| {
            builder.push_bold_safe(text.as_ref());
        })
    }

    /// Wraps text with inline code markers (`` `text` ``).
    pub fn inline_code(text: impl AsRef<str>) -> String {
        build(|builder| {
            builder.push_mono_safe(text.as_ref());
        })
    }

    fn build(apply: impl FnOnce(&mut MessageBuilder)) -> String {
        let mut builder = MessageBuilder::new();
        apply(&mut builder);
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::discord::{bold, inline_code};

    #[test]
    fn inline_code_wraps_with_backticks() {
        assert_eq!(inline_code("?"), "`?`");
    }

    #[test]
    fn bold_wraps_with_asterisks() {
        assert_eq!(bold("prefix"), "**prefix**");
    }
}
