use crate::functions::format::discord::inline_code;
use poise::ChoiceParameter;
use serenity::all::Colour;
use std::fmt;

/// Accent colours a guild can pick for its embeds.
///
/// The durable store keeps the lowercase name; resolution to a concrete
/// colour value always goes through this enumeration.
#[derive(ChoiceParameter, Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum ColourName {
    #[default]
    Purple,
    Blue,
    Teal,
    Green,
    Gold,
    Orange,
    Red,
    Magenta,
    Blurple,
}

impl ColourName {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Purple => "purple",
            Self::Blue => "blue",
            Self::Teal => "teal",
            Self::Green => "green",
            Self::Gold => "gold",
            Self::Orange => "orange",
            Self::Red => "red",
            Self::Magenta => "magenta",
            Self::Blurple => "blurple",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "purple" => Some(Self::Purple),
            "blue" => Some(Self::Blue),
            "teal" => Some(Self::Teal),
            "green" => Some(Self::Green),
            "gold" => Some(Self::Gold),
            "orange" => Some(Self::Orange),
            "red" => Some(Self::Red),
            "magenta" => Some(Self::Magenta),
            "blurple" => Some(Self::Blurple),
            _ => None,
        }
    }

    pub fn resolve(&self) -> Colour {
        match self {
            Self::Purple => Colour::PURPLE,
            Self::Blue => Colour::BLUE,
            Self::Teal => Colour::TEAL,
            Self::Green => Colour::FOOYOO,
            Self::Gold => Colour::GOLD,
            Self::Orange => Colour::ORANGE,
            Self::Red => Colour::RED,
            Self::Magenta => Colour::MAGENTA,
            Self::Blurple => Colour::BLURPLE,
        }
    }
}

impl fmt::Display for ColourName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub mod colors {
    use super::Colour;

    /// Fixed accent for error responses, never the guild colour.
    pub const ERROR: Colour = Colour::new(0xED4245);
}

/// Templates answered to a bare mention of the bot.
pub static PREFIX_RESPONSES: &[fn(&str) -> String] = &[
    |prefix| {
        format!(
            "Word in the halls is that my prefix here is {}. I neither confirm nor deny.",
            inline_code(prefix)
        )
    },
    |prefix| {
        format!(
            "You rang? Commands around here start with {}.",
            inline_code(prefix)
        )
    },
    |prefix| {
        format!(
            "Legend says whoever types {} before a command gains my undivided attention.",
            inline_code(prefix)
        )
    },
    |prefix| {
        format!(
            "My handlers insist I only respond to {}. Pinging me also works, but don't tell them.",
            inline_code(prefix)
        )
    },
    |prefix| {
        format!(
            "Prefix inspection requested. Current reading: {}. Carry on.",
            inline_code(prefix)
        )
    },
    |prefix| {
        format!(
            "If you must summon me, {} is the incantation this server settled on.",
            inline_code(prefix)
        )
    },
];

/// Generic responses for commands that blew up in their own handler.
pub static UNHANDLED_RESPONSES: &[&str] = &[
    "Something went sideways while running that. The owners have been notified.",
    "That command tripped over its own feet. A report is on its way upstairs.",
    "Well, that wasn't supposed to happen. I've filed the incident already.",
    "An unexpected error ate your command. The maintainers will hear of this.",
];
