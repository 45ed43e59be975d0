//! Sound intents.
//!
//! Bodies only record which sounds a tick asked for; an outside dispatcher
//! drains the set once per tick and plays them. A bit set dedups repeated
//! tags within one tick.

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum Sound {
    Bump = 1 << 0,
    Shoot = 1 << 1,
    Hit = 1 << 2,
    Squish = 1 << 3,
    Spring = 1 << 4,
    Die = 1 << 5,
    Save = 1 << 6,
    Powerup = 1 << 7,
    Break = 1 << 8,
}

impl Sound {
    pub const ALL: [Sound; 9] = [
        Sound::Bump,
        Sound::Shoot,
        Sound::Hit,
        Sound::Squish,
        Sound::Spring,
        Sound::Die,
        Sound::Save,
        Sound::Powerup,
        Sound::Break,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Sound::Bump => "bump",
            Sound::Shoot => "shoot",
            Sound::Hit => "hit",
            Sound::Squish => "squish",
            Sound::Spring => "spring",
            Sound::Die => "die",
            Sound::Save => "save",
            Sound::Powerup => "powerup",
            Sound::Break => "break",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SoundSet(u16);

impl SoundSet {
    pub const fn empty() -> Self {
        SoundSet(0)
    }

    pub fn insert(&mut self, sound: Sound) {
        self.0 |= sound as u16;
    }

    pub fn contains(&self, sound: Sound) -> bool {
        self.0 & sound as u16 != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn bits(&self) -> u16 {
        self.0
    }

    pub fn merge(&mut self, other: SoundSet) {
        self.0 |= other.0;
    }

    /// Returns the current tags and leaves the set empty.
    pub fn drain(&mut self) -> SoundSet {
        std::mem::take(self)
    }

    pub fn iter(&self) -> impl Iterator<Item = Sound> + '_ {
        Sound::ALL.into_iter().filter(|s| self.contains(*s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_tags_collapse() {
        let mut set = SoundSet::empty();
        set.insert(Sound::Bump);
        set.insert(Sound::Bump);
        set.insert(Sound::Spring);
        assert_eq!(set.iter().count(), 2);
        let drained = set.drain();
        assert!(set.is_empty());
        assert!(drained.contains(Sound::Spring));
    }
}
