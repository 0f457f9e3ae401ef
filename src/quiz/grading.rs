use rand::seq::SliceRandom;
use rand::Rng;

const ENCOURAGING_PHRASES: [&str; 6] = [
    "Every quiz is a step forward in mastering GMP! 🚀",
    "Keep up the great work! Repetition is key to learning. 🧠",
    "Don't be discouraged by mistakes, they are learning opportunities. 🌱",
    "Your GMP knowledge is growing with each attempt! 💪",
    "Challenge yourself again and see how much you've improved! 📈",
    "GMP expertise is built one question at a time. You're doing great! ✨",
];

pub fn percentage(score: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    score as f64 / total as f64 * 100.0
}

pub fn encouragement<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    ENCOURAGING_PHRASES
        .choose(rng)
        .copied()
        .unwrap_or(ENCOURAGING_PHRASES[0])
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Proficiency {
    Expert,
    Advanced,
    Intermediate,
    Basic,
    Beginner,
}

impl Proficiency {
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage >= 90.0 {
            Proficiency::Expert
        } else if percentage >= 75.0 {
            Proficiency::Advanced
        } else if percentage >= 50.0 {
            Proficiency::Intermediate
        } else if percentage >= 30.0 {
            Proficiency::Basic
        } else {
            Proficiency::Beginner
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Proficiency::Expert => "🌟",
            Proficiency::Advanced => "✅",
            Proficiency::Intermediate => "🟡",
            Proficiency::Basic => "🔸",
            Proficiency::Beginner => "🔴",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Proficiency::Expert => "Expert",
            Proficiency::Advanced => "Advanced",
            Proficiency::Intermediate => "Intermediate",
            Proficiency::Basic => "Basic",
            Proficiency::Beginner => "Beginner",
        }
    }

    pub fn comment(&self) -> &'static str {
        match self {
            Proficiency::Expert => "Outstanding knowledge of GMP principles! Excellent work.",
            Proficiency::Advanced => "Strong understanding of GMP requirements. Well done.",
            Proficiency::Intermediate => "Good foundational knowledge with room to grow.",
            Proficiency::Basic => "Some understanding, but further study is recommended.",
            Proficiency::Beginner => {
                "Consider foundational GMP training to improve your knowledge."
            }
        }
    }
}
