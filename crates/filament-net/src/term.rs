use crate::error::Error;

/// A word offset into the net arena.
pub type Loc = u64;

const TAG_SHIFT: u32 = 56;
const TARGET_MASK: u64 = (1 << TAG_SHIFT) - 1;

/// A port value: an 8-bit tag and a 56-bit target packed into one machine word.
///
/// The target is an arena offset for structural references (the base word of a
/// node, or the slot a variable forwards to) and a caller-chosen identifier
/// for `Sub` binder slots. The all-zero word is a valid term (`NUL` with
/// target 0), which is what consumed ports are overwritten with.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Term(pub u64);

/// The eight port tags. A tag determines both the kind of port and its
/// polarity; a well-formed wire always joins one negative end to one
/// positive end.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    /// Trivial value; the result of erasure. Positive.
    Nul = 0,
    /// Bound-variable occurrence, forwarding to a slot. Positive.
    Var = 1,
    /// Binder slot awaiting a value. Negative.
    Sub = 2,
    /// Erasing context. Negative.
    Era = 3,
    /// Lambda principal port. Positive.
    Lam = 4,
    /// Application principal port. Negative.
    App = 5,
    /// Superposition principal port. Positive.
    Sup = 6,
    /// Duplicator principal port. Negative.
    Dup = 7,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    Positive,
    Negative,
}

impl Tag {
    #[inline(always)]
    pub fn from_u8(value: u8) -> Option<Tag> {
        match value {
            0 => Some(Tag::Nul),
            1 => Some(Tag::Var),
            2 => Some(Tag::Sub),
            3 => Some(Tag::Era),
            4 => Some(Tag::Lam),
            5 => Some(Tag::App),
            6 => Some(Tag::Sup),
            7 => Some(Tag::Dup),
            _ => None,
        }
    }

    /// Polarity is a total property of the tag.
    #[inline(always)]
    pub fn polarity(self) -> Polarity {
        match self {
            Tag::Nul | Tag::Var | Tag::Lam | Tag::Sup => Polarity::Positive,
            Tag::Sub | Tag::Era | Tag::App | Tag::Dup => Polarity::Negative,
        }
    }
}

impl Term {
    /// The trivial value; also what consumed ports are overwritten with.
    pub const NUL: Term = Term(0);
    /// An erasing context with no storage behind it.
    pub const ERA: Term = Term((Tag::Era as u64) << TAG_SHIFT);

    /// Packs a tag byte and a target into a word, validating both ranges.
    pub fn pack(tag: u64, target: u64) -> Result<Term, Error> {
        if tag > 0xFF || target > TARGET_MASK {
            return Err(Error::InvalidTerm { tag, target });
        }
        Ok(Term((tag << TAG_SHIFT) | target))
    }

    /// Splits a word back into its raw tag byte and target. Total.
    #[inline(always)]
    pub fn unpack(self) -> (u8, Loc) {
        (self.tag_byte(), self.target())
    }

    /// Builds a term from a known-valid tag. Targets are produced by the
    /// arena allocator and stay far below the 56-bit ceiling.
    #[inline(always)]
    pub fn new(tag: Tag, target: Loc) -> Term {
        debug_assert!(target <= TARGET_MASK);
        Term(((tag as u64) << TAG_SHIFT) | target)
    }

    #[inline(always)]
    pub fn var(slot: Loc) -> Term {
        Term::new(Tag::Var, slot)
    }

    #[inline(always)]
    pub fn sub(id: u64) -> Term {
        Term::new(Tag::Sub, id)
    }

    #[inline(always)]
    pub fn lam(loc: Loc) -> Term {
        Term::new(Tag::Lam, loc)
    }

    #[inline(always)]
    pub fn app(loc: Loc) -> Term {
        Term::new(Tag::App, loc)
    }

    #[inline(always)]
    pub fn sup(loc: Loc) -> Term {
        Term::new(Tag::Sup, loc)
    }

    #[inline(always)]
    pub fn dup(loc: Loc) -> Term {
        Term::new(Tag::Dup, loc)
    }

    #[inline(always)]
    pub fn tag_byte(self) -> u8 {
        (self.0 >> TAG_SHIFT) as u8
    }

    /// The tag, if the tag byte is one of the eight known values.
    #[inline(always)]
    pub fn tag(self) -> Option<Tag> {
        Tag::from_u8(self.tag_byte())
    }

    #[inline(always)]
    pub fn target(self) -> Loc {
        self.0 & TARGET_MASK
    }

    #[inline(always)]
    pub fn is(self, tag: Tag) -> bool {
        self.tag_byte() == tag as u8
    }

    #[inline(always)]
    pub fn polarity(self) -> Option<Polarity> {
        self.tag().map(Tag::polarity)
    }

    #[inline(always)]
    pub fn as_u64(self) -> u64 {
        self.0
    }

    #[inline(always)]
    pub fn from_u64(word: u64) -> Term {
        Term(word)
    }
}

impl std::fmt::Debug for Term {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.tag() {
            Some(tag) => write!(f, "{:?}@{}", tag, self.target()),
            None => write!(f, "#{:02x}@{}", self.tag_byte(), self.target()),
        }
    }
}

/// An active pair: a negative principal wired to a positive principal,
/// ready to rewrite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Redex(pub Term, pub Term);
