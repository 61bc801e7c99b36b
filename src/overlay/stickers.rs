/// Built-in vector icons used by stickers, badges and the PIP placeholder.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StickerIcon {
    /// Stopwatch.
    Clock,
    /// Dollar coin.
    Coin,
    /// Flame, used for calories.
    Flame,
    /// Four-point sparkle.
    Sparkle,
    /// Head-and-shoulders silhouette.
    Person,
    /// Right-pointing arrow.
    Arrow,
    /// Leaf, used for ingredient tags.
    Leaf,
}

impl StickerIcon {
    /// SVG document on a 64x64 view box.
    pub fn svg(self) -> &'static str {
        match self {
            Self::Clock => CLOCK,
            Self::Coin => COIN,
            Self::Flame => FLAME,
            Self::Sparkle => SPARKLE,
            Self::Person => PERSON,
            Self::Arrow => ARROW,
            Self::Leaf => LEAF,
        }
    }
}

const CLOCK: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="64" height="64" viewBox="0 0 64 64">
<rect x="26" y="2" width="12" height="7" rx="2" fill="#ffffff"/>
<circle cx="32" cy="36" r="25" fill="#ffffff"/>
<circle cx="32" cy="36" r="20" fill="#ff6b35"/>
<path d="M32 36 L32 22 M32 36 L42 42" stroke="#ffffff" stroke-width="5" stroke-linecap="round" fill="none"/>
</svg>"##;

const COIN: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="64" height="64" viewBox="0 0 64 64">
<circle cx="32" cy="32" r="29" fill="#ffd23f"/>
<circle cx="32" cy="32" r="23" fill="none" stroke="#e0a800" stroke-width="3"/>
<path d="M40 22 C36 18 24 18 24 26 C24 34 40 30 40 38 C40 46 28 46 23 42 M32 14 L32 50" stroke="#7a5200" stroke-width="5" stroke-linecap="round" fill="none"/>
</svg>"##;

const FLAME: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="64" height="64" viewBox="0 0 64 64">
<path d="M32 4 C40 18 52 26 52 42 C52 54 43 62 32 62 C21 62 12 54 12 42 C12 30 22 24 24 12 C28 18 30 22 32 4 Z" fill="#ff4d2e"/>
<path d="M32 30 C36 38 42 42 42 50 C42 56 37 60 32 60 C27 60 22 56 22 50 C22 44 28 40 32 30 Z" fill="#ffd23f"/>
</svg>"##;

const SPARKLE: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="64" height="64" viewBox="0 0 64 64">
<path d="M32 2 C35 22 42 29 62 32 C42 35 35 42 32 62 C29 42 22 35 2 32 C22 29 29 22 32 2 Z" fill="#ffffff"/>
</svg>"##;

const PERSON: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="64" height="64" viewBox="0 0 64 64">
<circle cx="32" cy="22" r="13" fill="#ffffff" fill-opacity="0.85"/>
<path d="M8 62 C8 46 19 38 32 38 C45 38 56 46 56 62 Z" fill="#ffffff" fill-opacity="0.85"/>
</svg>"##;

const ARROW: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="64" height="64" viewBox="0 0 64 64">
<path d="M8 32 L50 32 M34 14 L52 32 L34 50" stroke="#ffffff" stroke-width="9" stroke-linecap="round" stroke-linejoin="round" fill="none"/>
</svg>"##;

const LEAF: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="64" height="64" viewBox="0 0 64 64">
<path d="M10 54 C10 24 28 8 58 6 C56 36 40 54 10 54 Z" fill="#4caf50"/>
<path d="M12 52 C24 40 34 30 48 16" stroke="#e8f5e9" stroke-width="4" stroke-linecap="round" fill="none"/>
</svg>"##;
