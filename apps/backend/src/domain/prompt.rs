//! Narrator prompt assembly.

use crate::ai::ChatMessage;
use crate::entities::messages::MessageRole;
use crate::repos::profiles::Attributes;

/// Messages of thread history sent with each completion.
pub const HISTORY_LIMIT: u64 = 30;

const TAG_RULES: &str = "\
When the story changes the party's state, append these tags to your reply:
[ITEM_ADD: item name] when the party gains an item.
[ITEM_REMOVE: item name] when the party loses or uses up an item.
[LEVEL_UP] when the party has earned a new level.
[ALIGNMENT: description] when the party's moral alignment shifts.
[GAME_OVER] when the party is defeated and the story ends.
[VICTORY] when the party completes the adventure.
Never explain the tags. Use them only when the event happens.";

pub struct StoryContext<'a> {
    pub title: &'a str,
    pub setting: &'a str,
    pub level: i32,
    pub alignment: &'a str,
    pub shared_inventory: &'a [String],
}

pub struct PartyMember<'a> {
    pub name: &'a str,
    pub attributes: Option<Attributes>,
    pub preferences: &'a str,
    pub inventory: &'a [String],
}

pub struct HistoryEntry<'a> {
    pub role: MessageRole,
    pub author: Option<&'a str>,
    pub content: &'a str,
}

/// One player's contribution to the turn being resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnAction {
    pub name: String,
    pub text: String,
}

fn list_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "nothing".to_string()
    } else {
        items.join(", ")
    }
}

pub fn system_prompt(story: &StoryContext<'_>, party: &[PartyMember<'_>]) -> String {
    let mut out = format!(
        "You are the narrator of a collaborative text role-playing game titled \"{}\".\n\
         Setting: {}\n\
         Party level: {}. Party alignment: {}.\n\
         Shared inventory: {}.\n",
        story.title,
        story.setting,
        story.level,
        story.alignment,
        list_or_none(story.shared_inventory),
    );

    out.push_str("\nThe party:\n");
    for member in party {
        out.push_str(&format!("- {}", member.name));
        if let Some(a) = member.attributes {
            out.push_str(&format!(
                " (STR {}, DEX {}, CON {}, INT {}, WIS {}, CHA {})",
                a.strength, a.dexterity, a.constitution, a.intelligence, a.wisdom, a.charisma
            ));
        }
        out.push_str(&format!("; carrying {}", list_or_none(member.inventory)));
        if !member.preferences.trim().is_empty() {
            out.push_str(&format!("; player notes: {}", member.preferences.trim()));
        }
        out.push('\n');
    }

    out.push_str(
        "\nDescribe the outcome of the players' actions in vivid second-person prose, \
         then invite their next move. Keep replies under 300 words.\n\n",
    );
    out.push_str(TAG_RULES);
    out
}

/// `**Name**: action` lines, one per player, in submission order.
pub fn format_actions(actions: &[TurnAction]) -> String {
    actions
        .iter()
        .map(|a| format!("**{}**: {}", a.name, a.text.trim()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Full message list for one completion.
pub fn build_messages(
    story: &StoryContext<'_>,
    party: &[PartyMember<'_>],
    history: &[HistoryEntry<'_>],
    actions: &[TurnAction],
) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(history.len() + 2);
    messages.push(ChatMessage::system(system_prompt(story, party)));

    for entry in history {
        let msg = match (entry.role, entry.author) {
            (MessageRole::User, Some(author)) => {
                ChatMessage::user(format!("**{author}**: {}", entry.content))
            }
            (MessageRole::User, None) => ChatMessage::user(entry.content),
            (MessageRole::Assistant, _) => ChatMessage::assistant(entry.content),
            (MessageRole::System, _) => ChatMessage::system(entry.content),
        };
        messages.push(msg);
    }

    messages.push(ChatMessage::user(format_actions(actions)));
    messages
}
