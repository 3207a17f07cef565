//! Rewards store catalog and game payouts.

use shared::RewardItem;

/// Items children can spend their main balance on
pub fn reward_catalog() -> Vec<RewardItem> {
    let item = |id: &str, name: &str, description: &str, price: u64, icon: &str| RewardItem {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        price,
        icon: icon.to_string(),
    };

    vec![
        item(
            "screen_time_30",
            "Extra 30min Screen Time",
            "Enjoy more time on your favorite game or show!",
            100,
            "🎮",
        ),
        item("story_book", "New Story Book", "Unlock a cool new digital story book.", 250, "📚"),
        item(
            "virtual_pet_accessory",
            "Virtual Pet Accessory",
            "A fancy hat for your virtual pet!",
            75,
            "🎩",
        ),
        item(
            "custom_avatar_pack",
            "Cool Avatar Pack",
            "Get new items to customize your app avatar.",
            150,
            "🧑‍🎨",
        ),
        item(
            "donate_charity_small",
            "Donate Rs.50 to Charity",
            "Help others by donating a small amount.",
            50,
            "💖",
        ),
    ]
}

pub fn find_reward(reward_id: &str) -> Option<RewardItem> {
    reward_catalog().into_iter().find(|reward| reward.id == reward_id)
}

/// Payout for one round of Budget Battle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameReward {
    pub money: u64,
    pub xp: u64,
}

impl GameReward {
    pub fn budget_battle(correct_answers: u32) -> Self {
        let correct = u64::from(correct_answers);
        Self {
            money: 20 + correct * 10,
            xp: 25 + correct * 15,
        }
    }
}
