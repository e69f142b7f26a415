use chrono::{DateTime, Utc};
use rand::prelude::*;
use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};

use crate::content::WordPuzzle;
use crate::session::{SessionMode, SessionOutcome};
use crate::*;

/// Uniform Fisher-Yates permutation of the letters of `word`.
///
/// The identity permutation is a legal result.
pub fn scramble<R: Rng>(word: &str, rng: &mut R) -> Vec<char> {
    let mut letters: Vec<char> = word.chars().collect();
    letters.shuffle(rng);
    letters
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LetterOutcome {
    NoChange,
    Moved,
    /// Answer completed and matches the word
    Correct,
    /// Answer completed with the wrong spelling
    Incorrect,
}

impl LetterOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }
}

/// One unscramble round.
///
/// Letters move between the scrambled slots and the answer, so the non-empty slots together with
/// the answer always hold exactly the letters of the word.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LetterScramble {
    word: String,
    scrambled: Vec<Option<char>>,
    answer: Vec<char>,
    verdict: Option<bool>,
}

impl LetterScramble {
    pub fn new<R: Rng>(word: &str, rng: &mut R) -> Result<Self> {
        if word.is_empty() {
            return Err(GameError::EmptyWord);
        }
        Ok(Self {
            word: word.to_string(),
            scrambled: scramble(word, rng).into_iter().map(Some).collect(),
            answer: Vec::new(),
            verdict: None,
        })
    }

    pub fn with_seed(word: &str, seed: u64) -> Result<Self> {
        Self::new(word, &mut SmallRng::seed_from_u64(seed))
    }

    pub fn word(&self) -> &str {
        &self.word
    }

    pub fn scrambled(&self) -> &[Option<char>] {
        &self.scrambled
    }

    pub fn answer(&self) -> &[char] {
        &self.answer
    }

    pub fn answer_string(&self) -> String {
        self.answer.iter().collect()
    }

    /// `Some(correct)` once the answer has as many letters as the word.
    pub fn verdict(&self) -> Option<bool> {
        self.verdict
    }

    pub fn is_finished(&self) -> bool {
        self.verdict.is_some()
    }

    pub fn remaining_letters(&self) -> impl Iterator<Item = char> + '_ {
        self.scrambled.iter().flatten().copied()
    }

    /// Moves the letter in `slot` to the end of the answer and checks the answer once it is full.
    pub fn place_letter(&mut self, slot: usize) -> LetterOutcome {
        if self.is_finished() {
            return LetterOutcome::NoChange;
        }
        let Some(letter) = self.scrambled.get_mut(slot).and_then(Option::take) else {
            return LetterOutcome::NoChange;
        };
        self.answer.push(letter);

        if self.answer.len() < self.word.chars().count() {
            return LetterOutcome::Moved;
        }

        let correct = self.answer_string() == self.word;
        self.verdict = Some(correct);
        log::debug!(
            "unscramble round for {:?} answered {:?}: {}",
            self.word,
            self.answer_string(),
            if correct { "correct" } else { "incorrect" }
        );
        if correct {
            LetterOutcome::Correct
        } else {
            LetterOutcome::Incorrect
        }
    }

    /// Puts the answer letter at `index` back into the first empty slot.
    pub fn remove_letter(&mut self, index: usize) -> LetterOutcome {
        if self.is_finished() || index >= self.answer.len() {
            return LetterOutcome::NoChange;
        }
        let letter = self.answer.remove(index);
        match self.scrambled.iter_mut().find(|slot| slot.is_none()) {
            Some(slot) => *slot = Some(letter),
            None => self.scrambled.push(Some(letter)),
        }
        LetterOutcome::Moved
    }

    /// Shuffles the letters not yet placed, dropping the empty slots. The answer is left alone.
    pub fn reshuffle_remaining<R: Rng>(&mut self, rng: &mut R) -> LetterOutcome {
        if self.is_finished() {
            return LetterOutcome::NoChange;
        }
        let mut remaining: Vec<char> = self.remaining_letters().collect();
        remaining.shuffle(rng);
        self.scrambled = remaining.into_iter().map(Some).collect();
        LetterOutcome::Moved
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnscrambleState {
    #[default]
    Setup,
    Playing,
    Results,
}

/// Plays a list of words one round at a time, one point per correct round.
#[derive(Clone, Debug)]
pub struct UnscrambleSession {
    puzzles: Vec<WordPuzzle>,
    current: usize,
    round: Option<LetterScramble>,
    rng: SmallRng,
    score: u32,
    hint_shown: bool,
    state: UnscrambleState,
}

impl UnscrambleSession {
    pub const TOPIC: &'static str = "Unscramble Word";

    pub fn new(puzzles: Vec<WordPuzzle>, seed: u64) -> Result<Self> {
        if puzzles.is_empty() {
            return Err(GameError::NoContent);
        }
        if puzzles.iter().any(|puzzle| puzzle.word.is_empty()) {
            return Err(GameError::EmptyWord);
        }
        Ok(Self {
            puzzles,
            current: 0,
            round: None,
            rng: SmallRng::seed_from_u64(seed),
            score: 0,
            hint_shown: false,
            state: UnscrambleState::Setup,
        })
    }

    pub fn state(&self) -> UnscrambleState {
        self.state
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn total(&self) -> u32 {
        self.puzzles.len() as u32
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn puzzle(&self) -> &WordPuzzle {
        &self.puzzles[self.current]
    }

    pub fn round(&self) -> Option<&LetterScramble> {
        self.round.as_ref()
    }

    pub fn hint(&self) -> Option<&str> {
        self.hint_shown.then(|| self.puzzle().hint.as_str())
    }

    /// Starts over from the first word.
    pub fn start(&mut self) -> Result<()> {
        self.current = 0;
        self.score = 0;
        self.state = UnscrambleState::Playing;
        self.load_round()
    }

    pub fn show_hint(&mut self) {
        if self.state == UnscrambleState::Playing {
            self.hint_shown = true;
        }
    }

    pub fn place_letter(&mut self, slot: usize) -> LetterOutcome {
        let Some(round) = self.round.as_mut() else {
            return LetterOutcome::NoChange;
        };
        let outcome = round.place_letter(slot);
        if outcome == LetterOutcome::Correct {
            self.score += 1;
        }
        outcome
    }

    pub fn remove_letter(&mut self, index: usize) -> LetterOutcome {
        self.round
            .as_mut()
            .map_or(LetterOutcome::NoChange, |round| round.remove_letter(index))
    }

    pub fn reshuffle(&mut self) -> LetterOutcome {
        match self.round.as_mut() {
            Some(round) => round.reshuffle_remaining(&mut self.rng),
            None => LetterOutcome::NoChange,
        }
    }

    /// Moves past a finished round. Returns `true` when another word was loaded, `false` when the
    /// round is still open or the session just reached its results.
    pub fn advance(&mut self) -> Result<bool> {
        if !self.round.as_ref().is_some_and(LetterScramble::is_finished) {
            return Ok(false);
        }
        if self.current + 1 < self.puzzles.len() {
            self.current += 1;
            self.load_round()?;
            Ok(true)
        } else {
            self.round = None;
            self.state = UnscrambleState::Results;
            log::debug!("unscramble finished with {}/{}", self.score, self.total());
            Ok(false)
        }
    }

    pub fn outcome(
        &self,
        time_spent_secs: u64,
        timestamp: DateTime<Utc>,
    ) -> Option<SessionOutcome> {
        (self.state == UnscrambleState::Results).then(|| {
            SessionOutcome::new(
                Self::TOPIC,
                SessionMode::MiniGame,
                self.score,
                self.total(),
                time_spent_secs,
                timestamp,
            )
        })
    }

    fn load_round(&mut self) -> Result<()> {
        let round = LetterScramble::new(&self.puzzles[self.current].word, &mut self.rng)?;
        self.round = Some(round);
        self.hint_shown = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::builtin_word_puzzles;

    fn sorted(letters: impl IntoIterator<Item = char>) -> Vec<char> {
        let mut letters: Vec<char> = letters.into_iter().collect();
        letters.sort_unstable();
        letters
    }

    fn slot_of(round: &LetterScramble, letter: char) -> usize {
        round
            .scrambled()
            .iter()
            .position(|&slot| slot == Some(letter))
            .unwrap()
    }

    fn solve(round: &mut LetterScramble) -> LetterOutcome {
        let word: Vec<char> = round.word().chars().collect();
        let mut last = LetterOutcome::NoChange;
        for letter in word {
            last = round.place_letter(slot_of(round, letter));
        }
        last
    }

    #[test]
    fn scramble_keeps_letter_multiset() {
        for seed in 0..32 {
            let mut rng = SmallRng::seed_from_u64(seed);
            for puzzle in builtin_word_puzzles() {
                let letters = scramble(&puzzle.word, &mut rng);
                assert_eq!(sorted(letters), sorted(puzzle.word.chars()));
            }
        }
    }

    #[test]
    fn place_then_remove_restores_slots() {
        let mut round = LetterScramble::with_seed("RAINBOW", 7).unwrap();
        let before = round.clone();

        assert_eq!(round.place_letter(2), LetterOutcome::Moved);
        assert_eq!(round.scrambled()[2], None);
        assert_eq!(round.answer().len(), 1);

        assert_eq!(round.remove_letter(0), LetterOutcome::Moved);
        assert_eq!(
            sorted(round.remaining_letters()),
            sorted(before.remaining_letters())
        );
        assert!(round.answer().is_empty());
    }

    #[test]
    fn letters_are_conserved_while_playing() {
        let mut round = LetterScramble::with_seed("BUTTERFLY", 3).unwrap();

        round.place_letter(0);
        round.place_letter(4);
        round.place_letter(8);
        round.remove_letter(1);
        round.reshuffle_remaining(&mut SmallRng::seed_from_u64(11));

        let letters = round
            .remaining_letters()
            .chain(round.answer().iter().copied());
        assert_eq!(sorted(letters), sorted("BUTTERFLY".chars()));
    }

    #[test]
    fn original_order_is_correct() {
        let mut round = LetterScramble::with_seed("KEYBOARD", 42).unwrap();

        assert_eq!(solve(&mut round), LetterOutcome::Correct);
        assert_eq!(round.verdict(), Some(true));
        assert_eq!(round.answer_string(), "KEYBOARD");
    }

    #[test]
    fn wrong_order_is_incorrect_and_ends_round() {
        let mut round = LetterScramble::with_seed("AB", 1).unwrap();
        let b = slot_of(&round, 'B');
        let a = slot_of(&round, 'A');

        assert_eq!(round.place_letter(b), LetterOutcome::Moved);
        assert_eq!(round.place_letter(a), LetterOutcome::Incorrect);
        assert_eq!(round.remove_letter(0), LetterOutcome::NoChange);
        assert_eq!(
            round.reshuffle_remaining(&mut SmallRng::seed_from_u64(0)),
            LetterOutcome::NoChange
        );
    }

    #[test]
    fn repeated_letters_solve_in_either_slot_order() {
        let mut round = LetterScramble::with_seed("aa", 5).unwrap();

        round.place_letter(1);

        assert_eq!(round.place_letter(0), LetterOutcome::Correct);
    }

    #[test]
    fn mixed_case_word_solves_in_order() {
        let mut round = LetterScramble::with_seed("McDonald", 8).unwrap();

        assert_eq!(solve(&mut round), LetterOutcome::Correct);
    }

    #[test]
    fn empty_and_out_of_range_slots_are_ignored() {
        let mut round = LetterScramble::with_seed("CAT", 9).unwrap();
        round.place_letter(1);

        assert_eq!(round.place_letter(1), LetterOutcome::NoChange);
        assert_eq!(round.place_letter(17), LetterOutcome::NoChange);
        assert_eq!(round.remove_letter(3), LetterOutcome::NoChange);
    }

    #[test]
    fn reshuffle_drops_empty_slots() {
        let mut round = LetterScramble::with_seed("MOUNTAIN", 2).unwrap();
        round.place_letter(0);
        round.place_letter(1);

        round.reshuffle_remaining(&mut SmallRng::seed_from_u64(4));

        assert_eq!(round.scrambled().len(), 6);
        assert!(round.scrambled().iter().all(Option::is_some));
        assert_eq!(round.answer().len(), 2);
    }

    #[test]
    fn empty_word_is_rejected() {
        assert_eq!(LetterScramble::with_seed("", 0), Err(GameError::EmptyWord));
    }

    #[test]
    fn session_scores_rounds_and_reaches_results() {
        let puzzles = vec![
            WordPuzzle::new("CAT", "Pet", "Animals"),
            WordPuzzle::new("DOG", "Pet", "Animals"),
        ];
        let mut session = UnscrambleSession::new(puzzles, 12).unwrap();
        session.start().unwrap();
        assert_eq!(session.hint(), None);
        session.show_hint();
        assert_eq!(session.hint(), Some("Pet"));

        assert!(!session.advance().unwrap());
        for letter in "CAT".chars() {
            let slot = slot_of(session.round().unwrap(), letter);
            session.place_letter(slot);
        }
        assert_eq!(session.score(), 1);
        assert_eq!(session.round().unwrap().verdict(), Some(true));

        assert!(session.advance().unwrap());
        assert_eq!(session.puzzle().word, "DOG");
        assert_eq!(session.hint(), None);

        let round = session.round().unwrap().clone();
        for letter in "GOD".chars() {
            session.place_letter(slot_of(&round, letter));
        }
        assert_eq!(session.score(), 1);
        assert!(!session.advance().unwrap());
        assert_eq!(session.state(), UnscrambleState::Results);

        let now = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let outcome = session.outcome(40, now).unwrap();
        assert_eq!((outcome.score, outcome.total), (1, 2));
        assert_eq!(outcome.topic, "Unscramble Word");
    }

    #[test]
    fn session_rejects_empty_content() {
        assert!(matches!(
            UnscrambleSession::new(Vec::new(), 0),
            Err(GameError::NoContent)
        ));
        assert!(matches!(
            UnscrambleSession::new(vec![WordPuzzle::new("", "", "")], 0),
            Err(GameError::EmptyWord)
        ));
    }
}
