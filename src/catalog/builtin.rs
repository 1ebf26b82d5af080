//! Built-in catalog rows used when the config file does not provide its own.

use super::definitions::{
    AchievementCategory, AchievementDefinition, BadgeDefinition, ConditionType,
    DailyChallengeDefinition,
};

fn achievement(
    key: &str,
    title: &str,
    description: &str,
    xp_reward: u32,
    icon: &str,
    category: AchievementCategory,
) -> AchievementDefinition {
    AchievementDefinition {
        key: key.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        xp_reward,
        repeatable: false,
        max_repeats: None,
        category,
        icon: Some(icon.to_string()),
        condition_type: None,
        condition_value: None,
    }
}

fn repeatable(mut def: AchievementDefinition, max_repeats: Option<u32>) -> AchievementDefinition {
    def.repeatable = true;
    def.max_repeats = max_repeats;
    def
}

fn condition(mut def: AchievementDefinition, ty: ConditionType, value: u32) -> AchievementDefinition {
    def.condition_type = Some(ty);
    def.condition_value = Some(value);
    def
}

pub(super) fn achievements() -> Vec<AchievementDefinition> {
    use AchievementCategory::*;
    use ConditionType::*;

    vec![
        // === DAILY ===
        repeatable(
            achievement("DAILY_SPARK_A", "Morning Momentum", "Complete your first daily challenge of the day", 30, "🌅", Daily),
            None,
        ),
        repeatable(
            achievement("DAILY_SPARK_B", "Midday Maven", "Stay productive with your second daily challenge", 30, "☀️", Daily),
            None,
        ),
        repeatable(
            achievement("DAILY_SPARK_C", "Evening Excellence", "Close out the day with your third challenge", 30, "🌙", Daily),
            None,
        ),
        // === CAREER ===
        condition(
            achievement("APPLICATION_ACE", "Application Ace", "Submit 5 job applications", 50, "🎯", Career),
            ApplicationCount,
            5,
        ),
        condition(
            achievement("INTERVIEW_TRAILBLAZER", "Interview Trailblazer", "Land 5 interviews", 50, "🚀", Career),
            InterviewCount,
            5,
        ),
        repeatable(
            achievement("INTERVIEW_INSIGHT", "Interview Insight", "Complete an interview for your application", 20, "💡", Career),
            None,
        ),
        // === COMMUNITY ===
        repeatable(
            achievement("THOUGHT_LEADER", "Thought Leader", "Share your wisdom by publishing a post", 20, "📝", Community),
            None,
        ),
        repeatable(
            achievement("COMMUNITY_VOICE", "Community Voice", "Engage with the community by leaving a comment", 5, "💬", Community),
            None,
        ),
        condition(
            achievement("CONNECTOR", "Social Butterfly", "Make 5 interactions", 10, "🦋", Community),
            InteractionCount,
            5,
        ),
        // === CV ===
        condition(
            repeatable(
                achievement("RESUME_ARCHIVIST", "Resume Archivist", "Create 3 different CVs", 50, "📚", Cv),
                Some(10),
            ),
            CvCount,
            3,
        ),
        // === MILESTONE ===
        repeatable(
            achievement("ADVISOR", "Career Navigator", "Complete a career advice consultation session", 50, "🧭", Milestone),
            None,
        ),
        repeatable(
            achievement("ADVICE_STEP_COMPLETE", "Step Master", "Complete an individual advice step", 10, "👣", Milestone),
            None,
        ),
        // === PROFILE ===
        condition(
            achievement("PROFILE_PIONEER", "Profile Pioneer", "Complete your profile setup", 50, "🏆", Profile),
            ProfileComplete,
            100,
        ),
        condition(
            achievement("LAUNCHPAD", "Launchpad", "Add your first project to showcase your work", 30, "🎪", Profile),
            ProjectCount,
            1,
        ),
        condition(
            achievement("PROJECT_BUILDER", "Project Builder", "Showcase 5 projects", 100, "🏗️", Profile),
            ProjectCount,
            5,
        ),
        condition(
            achievement("SKILL_COLLECTOR", "Skill Collector", "Add 5 skills to your profile", 30, "🎨", Profile),
            SkillCount,
            5,
        ),
        condition(
            achievement("SKILL_MASTER", "Skill Master", "Master 10 skills", 70, "🎓", Profile),
            SkillCount,
            10,
        ),
        condition(
            achievement("WORK_STARTER", "Work Starter", "Add your first work experience", 20, "💼", Profile),
            ExperienceCount,
            1,
        ),
        condition(
            achievement("CAREER_CLIMBER", "Career Climber", "Document 3 work experiences", 80, "📈", Profile),
            ExperienceCount,
            3,
        ),
    ]
}

pub(super) fn badges() -> Vec<BadgeDefinition> {
    [
        (1, "Bronze Explorer", "You've taken your first steps on the journey!", "🥉", "#CD7F32"),
        (2, "Silver Seeker", "Your dedication is paying off!", "🥈", "#C0C0C0"),
        (3, "Gold Achiever", "You're shining bright with your accomplishments!", "🥇", "#FFD700"),
        (4, "Platinum Pioneer", "A true trailblazer in the making!", "💎", "#E5E4E2"),
        (5, "Diamond Champion", "Your commitment is crystal clear!", "💠", "#B9F2FF"),
        (6, "Ruby Rising Star", "You're on fire with passion and progress!", "❤️", "#E0115F"),
        (7, "Emerald Expert", "Your expertise grows with every achievement!", "💚", "#50C878"),
        (8, "Sapphire Sage", "Wisdom and experience shine through!", "💙", "#0F52BA"),
        (9, "Obsidian Oracle", "A master of the craft, respected by all!", "🖤", "#353935"),
        (10, "Legendary Legend", "You've achieved legendary status!", "👑", "#9400D3"),
        (12, "Mythic Master", "Your achievements have become the stuff of legends!", "🌟", "#FF69B4"),
        (15, "Cosmic Champion", "You've transcended all expectations!", "🌌", "#8B00FF"),
        (20, "Ultimate Unicorn", "A rare and magical achiever!", "🦄", "#FF1493"),
    ]
    .into_iter()
    .map(|(level, name, description, icon, color)| BadgeDefinition {
        level,
        name: name.to_string(),
        description: description.to_string(),
        icon: Some(icon.to_string()),
        color: Some(color.to_string()),
    })
    .collect()
}

pub(super) fn daily_challenges() -> Vec<DailyChallengeDefinition> {
    [
        ("DAILY_SPARK_A", "Morning Momentum", "Update your profile or add a new skill", "🌅"),
        ("DAILY_SPARK_B", "Midday Maven", "Apply to a job or engage with a post", "☀️"),
        ("DAILY_SPARK_C", "Evening Excellence", "Review your applications or update your CV", "🌙"),
    ]
    .into_iter()
    .map(|(key, title, description, icon)| DailyChallengeDefinition {
        key: key.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        xp_reward: 30,
        icon: Some(icon.to_string()),
    })
    .collect()
}
