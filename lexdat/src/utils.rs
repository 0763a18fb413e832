pub trait FromU32 {
    fn from_u32(src: u32) -> Self;
}

#[cfg(any(target_pointer_width = "32", target_pointer_width = "64"))]
impl FromU32 for usize {
    #[inline(always)]
    fn from_u32(src: u32) -> Self {
        // Since the pointer width is guaranteed to be 32 or 64,
        // the conversion is lossless.
        src as Self
    }
}

/// Gets the array displacement of a character.
#[inline(always)]
pub fn code_of(c: char) -> usize {
    usize::from_u32(u32::from(c))
}

/// Inverse of [`code_of`]. Zero and invalid code points yield `None`.
#[inline(always)]
pub fn char_of(code: usize) -> Option<char> {
    u32::try_from(code)
        .ok()
        .and_then(char::from_u32)
        .filter(|&c| c != '\0')
}

/// Finds the first zero code point in `key`.
#[inline(always)]
pub fn find_zero_char(key: &str) -> Option<usize> {
    key.chars().position(|c| c == '\0')
}

#[cfg(test)]
macro_rules! hashmap {
    ( $($k:expr => $v:expr,)* ) => {
        {
            #[allow(unused_mut)]
            let mut h = hashbrown::HashMap::new();
            $(
                h.insert($k, $v);
            )*
            h
        }
    };
    ( $($k:expr => $v:expr),* ) => {
        hashmap![$( $k => $v, )*]
    };
}

#[cfg(test)]
pub(crate) use hashmap;
