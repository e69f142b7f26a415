//! Read-only content records handed to the engines, plus the built-in puzzle levels.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuizCategory {
    #[default]
    General,
    Technology,
    Movies,
    Quotes,
    Emoji,
    Landmarks,
    Riddles,
    Logos,
}

impl QuizCategory {
    pub const ALL: [Self; 8] = [
        Self::General,
        Self::Technology,
        Self::Movies,
        Self::Quotes,
        Self::Emoji,
        Self::Landmarks,
        Self::Riddles,
        Self::Logos,
    ];

    /// Route slug lookup, unknown slugs fall back to general knowledge.
    pub fn from_slug(slug: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|category| category.slug() == slug)
            .unwrap_or_default()
    }

    pub const fn slug(self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Technology => "technology",
            Self::Movies => "movies",
            Self::Quotes => "quotes",
            Self::Emoji => "emoji",
            Self::Landmarks => "landmarks",
            Self::Riddles => "riddles",
            Self::Logos => "logos",
        }
    }

    pub const fn display_name(self) -> &'static str {
        match self {
            Self::General => "General Knowledge",
            Self::Technology => "Technology",
            Self::Movies => "Movies & TV",
            Self::Quotes => "Quote Quiz",
            Self::Emoji => "Emoji Quiz",
            Self::Landmarks => "Landmarks",
            Self::Riddles => "Riddles",
            Self::Logos => "Logo Quiz",
        }
    }

    /// Categories listed with the visual and fun quizzes rather than the classic trivia ones.
    pub const fn is_visual(self) -> bool {
        matches!(
            self,
            Self::Emoji | Self::Landmarks | Self::Logos | Self::Riddles
        )
    }
}

impl fmt::Display for QuizCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordPuzzle {
    pub word: String,
    pub hint: String,
    pub category: String,
}

impl WordPuzzle {
    pub fn new(word: &str, hint: &str, category: &str) -> Self {
        Self {
            word: word.to_string(),
            hint: hint.to_string(),
            category: category.to_string(),
        }
    }
}

/// Path-puzzle level as authored: one string per row, `S` start, `E` end, `#` wall, `T` trap.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathLevel {
    pub name: String,
    pub rows: Vec<String>,
}

impl PathLevel {
    pub fn new(name: &str, rows: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            rows: rows.iter().map(|row| row.to_string()).collect(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryLevel {
    pub image_url: String,
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: usize,
    #[serde(default = "MemoryLevel::default_view_time")]
    pub view_time_secs: u32,
}

impl MemoryLevel {
    pub const DEFAULT_VIEW_TIME_SECS: u32 = 10;

    pub fn new(image_url: &str, question: &str, options: &[&str], correct_answer: usize) -> Self {
        Self {
            image_url: image_url.to_string(),
            question: question.to_string(),
            options: options.iter().map(|option| option.to_string()).collect(),
            correct_answer,
            view_time_secs: Self::DEFAULT_VIEW_TIME_SECS,
        }
    }

    fn default_view_time() -> u32 {
        Self::DEFAULT_VIEW_TIME_SECS
    }
}

#[rustfmt::skip]
const EASY_PATH: [&str; 8] = [
    "S.......",
    ".#.#.#..",
    ".#.#.#..",
    ".#...#..",
    "...#....",
    ".#.#.##.",
    ".#......",
    "...#...E",
];

#[rustfmt::skip]
const MODERATE_MAZE: [&str; 8] = [
    "S.#..#..",
    "#.#.T#.#",
    "...##...",
    ".#T...#T",
    "#..#T#..",
    "..#....#",
    ".#.T#.#.",
    "#..#...E",
];

#[rustfmt::skip]
const HARD_CHALLENGE: [&str; 8] = [
    "S.#T.#.T",
    "#.#.T#.#",
    ".T.##.T.",
    "T#.T..#T",
    "#.T#.#..",
    "..#T..T#",
    "T#..#T#.",
    "#.T#...E",
];

pub fn builtin_path_levels() -> Vec<PathLevel> {
    vec![
        PathLevel::new("Easy Path", &EASY_PATH),
        PathLevel::new("Moderate Maze", &MODERATE_MAZE),
        PathLevel::new("Hard Challenge", &HARD_CHALLENGE),
    ]
}

pub fn builtin_word_puzzles() -> Vec<WordPuzzle> {
    vec![
        WordPuzzle::new(
            "JAVASCRIPT",
            "Popular programming language for web development",
            "Technology",
        ),
        WordPuzzle::new("ELEPHANT", "Large mammal with a trunk", "Animals"),
        WordPuzzle::new("RAINBOW", "Colorful arc in the sky after rain", "Nature"),
        WordPuzzle::new(
            "COMPUTER",
            "Electronic device for processing data",
            "Technology",
        ),
        WordPuzzle::new("BUTTERFLY", "Insect with colorful wings", "Animals"),
        WordPuzzle::new("MOUNTAIN", "Large natural elevation of earth", "Geography"),
        WordPuzzle::new(
            "TELESCOPE",
            "Instrument for viewing distant objects",
            "Science",
        ),
        WordPuzzle::new("CHOCOLATE", "Sweet treat made from cocoa", "Food"),
        WordPuzzle::new("ADVENTURE", "Exciting or unusual experience", "General"),
        WordPuzzle::new(
            "KEYBOARD",
            "Input device with letters and numbers",
            "Technology",
        ),
    ]
}

pub fn builtin_memory_levels() -> Vec<MemoryLevel> {
    vec![
        MemoryLevel::new(
            "https://images.unsplash.com/photo-1518837695005-2083093ee35b?w=600",
            "What is the main subject of this image?",
            &[
                "Ocean waves",
                "Mountain landscape",
                "Forest trees",
                "Desert dunes",
            ],
            0,
        ),
        MemoryLevel::new(
            "https://images.unsplash.com/photo-1441974231531-c6227db76b6e?w=600",
            "What type of environment is shown in this image?",
            &[
                "Urban city",
                "Dense forest",
                "Beach resort",
                "Mountain valley",
            ],
            1,
        ),
        MemoryLevel::new(
            "https://images.unsplash.com/photo-1506905925346-21bda4d32df4?w=600",
            "What architectural style is prominently featured?",
            &[
                "Gothic cathedral",
                "Modern skyscraper",
                "Opera house",
                "Ancient temple",
            ],
            2,
        ),
        MemoryLevel::new(
            "https://images.unsplash.com/photo-1469474968028-56623f02e42e?w=600",
            "What is the dominant color in this landscape?",
            &["Blue", "Green", "Brown", "White"],
            1,
        ),
        MemoryLevel::new(
            "https://images.unsplash.com/photo-1506905925346-21bda4d32df4?w=600",
            "What time of day does this appear to be taken?",
            &["Early morning", "Midday", "Sunset/Evening", "Night"],
            2,
        ),
    ]
}
