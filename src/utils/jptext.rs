#![forbid(unsafe_code)]

use lazy_static::lazy_static;
use rand::Rng;

// ***************************************************************************
//                                Constants
// ***************************************************************************
// The three disjoint alphabets, each a fixed ordered sequence of symbols.
const HIRAGANA : &str = "あいうえおかきくけこさしすせそたちつてとなにぬねのはひふへほまみむめもやゆよらりるれろわをん";
const KATAKANA : &str = "アイウエオカキクケコサシスセソタチツテトナニヌネノハヒフヘホマミムメモヤユヨラリルレロワヲン";
const KANJI    : &str = "一二三四五六七八九十日月火水木金土山川天空人";

// String length bounds, both inclusive.
const MIN_STRING_LEN : usize = 1;
const MAX_STRING_LEN : usize = 30;

// ***************************************************************************
//                             Static Variables
// ***************************************************************************
// Indexable character tables built once from the alphabet strings.
lazy_static! {
    static ref ALPHABETS: [Vec<char>; 3] = [
        HIRAGANA.chars().collect(),
        KATAKANA.chars().collect(),
        KANJI.chars().collect(),
    ];
}

// ***************************************************************************
//                                Functions
// ***************************************************************************
// ---------------------------------------------------------------------------
// random_character:
// ---------------------------------------------------------------------------
/** Draw a single character: first select one of the three alphabets with
 * equal probability, then select one symbol from the chosen alphabet
 * uniformly at random.  The random source is supplied by the caller so that
 * seeded tests are deterministic.
 */
#[allow(dead_code)]
pub fn random_character<R: Rng + ?Sized>(rng: &mut R) -> char {
    let alphabet = &ALPHABETS[rng.gen_range(0..ALPHABETS.len())];
    alphabet[rng.gen_range(0..alphabet.len())]
}

// ---------------------------------------------------------------------------
// random_string:
// ---------------------------------------------------------------------------
/** Build a string of 1 to 30 characters, length chosen uniformly, with the
 * alphabet re-chosen independently for every character.
 */
#[allow(dead_code)]
pub fn random_string<R: Rng + ?Sized>(rng: &mut R) -> String {
    let len = rng.gen_range(MIN_STRING_LEN..=MAX_STRING_LEN);
    (0..len).map(|_| random_character(rng)).collect()
}
