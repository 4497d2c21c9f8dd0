use serde::{Deserialize, Serialize};

/// Sounds the core can trigger. The host maps these onto whatever mixer it
/// uses; nothing in the core reads anything back from playback.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum Sound {
    Ow = 0,
    Gulp = 1,
    Swish = 2,
    Discovery = 3,
    Clang = 4,
    Explode = 5,
    Boom = 6,
    Door = 7,
    Woop = 8,
    Angel = 9,
    Fall = 10,
    EnemyHit = 11,
    BossHit = 12,
    BossDeath = 13,
}

impl Sound {
    /// Mapping used by the script SOUND command. Unknown ids fall back to
    /// Clang rather than failing the script.
    pub fn from_id(id: i32) -> Sound {
        match id {
            0 => Sound::Ow,
            1 => Sound::Gulp,
            2 => Sound::Swish,
            3 => Sound::Discovery,
            4 => Sound::Clang,
            5 => Sound::Explode,
            6 => Sound::Boom,
            7 => Sound::Door,
            8 => Sound::Woop,
            9 => Sound::Angel,
            10 => Sound::Fall,
            11 => Sound::EnemyHit,
            12 => Sound::BossHit,
            13 => Sound::BossDeath,
            _ => Sound::Clang,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DialogKind {
    Speech,
    Sign,
}

/// Seam to the excluded collaborators: sound playback, the resource text
/// table and the modal Say/Ask dialog surfaces. The dialog calls are
/// fire-and-forget; completion is signalled back into the script
/// interpreter via Scripts::set_ask_response / Scripts::dialog_closed.
pub trait GotEnv {
    fn play_sound(&mut self, sound: Sound, exclusive: bool);
    fn read_script_table(&mut self, key: &str) -> Option<String>;
    fn show_say(&mut self, text: &str, speaker_icon: u8, kind: DialogKind);
    fn show_ask(&mut self, title: &str, options: &[String]);
    fn script_pause(&mut self, _ticks: i32) {}
}

/// No-op environment for hosts that run the core headless.
pub struct NullEnv;

impl GotEnv for NullEnv {
    fn play_sound(&mut self, _sound: Sound, _exclusive: bool) {}

    fn read_script_table(&mut self, _key: &str) -> Option<String> {
        None
    }

    fn show_say(&mut self, _text: &str, _speaker_icon: u8, _kind: DialogKind) {}

    fn show_ask(&mut self, _title: &str, _options: &[String]) {}
}
