//! Prompt text sent to the AI collaborator.

use shared::Child;

/// Games available in the app, offered to the model for game-based tasks
pub const AVAILABLE_GAMES: [&str; 6] = [
    "Money Quest",
    "ChoreMaster",
    "Budget Battle",
    "Halal Hustle",
    "Startup Tycoon Jr.",
    "Savings Race",
];

pub fn task_generation_prompt(child_name: &str, child_age: u32) -> String {
    let game_list = AVAILABLE_GAMES.join(", ");

    format!(
        r#"You are a creative task generator for a kids' financial literacy app called KidsBank.
Generate 3-4 engaging tasks for a child named {child_name}, who is {child_age} years old.
The tasks should promote financial literacy, responsibility, or learning through play.
Some tasks MUST involve playing educational games available in the app. The available games are: {game_list}.
When creating a game-based task, clearly state the game and a simple objective (e.g., "Play 'Budget Battle' and answer 3 questions correctly").
Tasks should have a title, a kid-friendly description, and a suggested reward in Pakistani Rupees (Rs.) between 20 and 100.
Ensure tasks are culturally relevant for Pakistan and use simple language.
Format the output as a JSON array of objects. Each object MUST have "title" (string), "description" (string), and "reward" (number).

Example of a game-based task description: "Play 'Budget Battle' and try to get a score of 70% or higher to understand smart spending!"
Example of a non-game task: "Help set the table for dinner for 3 days this week."

Provide ONLY the JSON array in your response.
"#
    )
}

pub fn welcome_prompt(child: &Child, completed_tasks: usize) -> String {
    format!(
        "You are a friendly AI money buddy for Pakistani kids. Welcome {} (age {}) to their financial dashboard. \
         They have Rs. {} balance and {} completed tasks. Give them a warm, encouraging message in simple English \
         with some Urdu words mixed in. Keep it under 50 words and include relevant emojis. Be culturally appropriate for Pakistan.",
        child.name, child.age, child.balance, completed_tasks
    )
}

/// Greeting used when the collaborator could not produce one
pub fn offline_welcome(child: &Child) -> String {
    format!(
        "Assalam-o-Alaikum {}! 🌟 Welcome to your KidsBank dashboard! You're doing great with Rs. {} saved. \
         Ready to learn and earn more? Let's go! 💪",
        child.name, child.balance
    )
}

/// FinBuddy system prompt followed by the child's question
pub fn chat_prompt(child: &Child, message: &str) -> String {
    format!(
        r#"You are FinBuddy, a friendly, encouraging, and knowledgeable financial assistant for Pakistani kids and teens (current user: {name}, age {age}, balance Rs. {balance}).
Your goal is to teach them about money management (saving, smart spending, budgeting, basic halal earning/investing concepts) in a simple, step-by-step, and engaging way.
Use simple English and mix in common Urdu words naturally (e.g., 'bachat' for saving, 'kharch' for spending, 'shabash' for well done, 'rupay' for rupees).
Be culturally appropriate for Pakistan.
If asked about actions on the platform (like "how to deposit money", "how to save for a toy", "how to buy rewards"), guide them on how to use the app's features.
Keep responses concise, friendly, and actionable. Use emojis to make it fun.
Do NOT invent features that don't exist. Stick to guiding on existing or plausible app functionalities.
Do NOT perform transactions or modify account data directly. You are a guide.

User: {message}"#,
        name = child.name,
        age = child.age,
        balance = child.balance,
        message = message.trim(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::CardDesign;

    fn child() -> Child {
        Child {
            id: "child-1".to_string(),
            name: "Fatima".to_string(),
            age: 11,
            avatar: "👧".to_string(),
            balance: 340,
            internal_wallet_balance: 0,
            parent_id: "parent-1".to_string(),
            card_design: CardDesign::derived_default("👧", "Fatima"),
            savings_goal: None,
        }
    }

    #[test]
    fn test_task_prompt_mentions_child_and_games() {
        let prompt = task_generation_prompt("Fatima", 11);
        assert!(prompt.contains("a child named Fatima, who is 11 years old"));
        assert!(prompt.contains("Budget Battle"));
        assert!(prompt.contains("Startup Tycoon Jr."));
        assert!(prompt.contains("Provide ONLY the JSON array"));
    }

    #[test]
    fn test_welcome_prompts() {
        let prompt = welcome_prompt(&child(), 4);
        assert!(prompt.contains("Welcome Fatima (age 11)"));
        assert!(prompt.contains("Rs. 340 balance and 4 completed tasks"));

        assert!(offline_welcome(&child()).starts_with("Assalam-o-Alaikum Fatima!"));
    }

    #[test]
    fn test_chat_prompt_appends_question() {
        let prompt = chat_prompt(&child(), "  How do I save for a bicycle?  ");
        assert!(prompt.starts_with("You are FinBuddy"));
        assert!(prompt.ends_with("User: How do I save for a bicycle?"));
    }
}
