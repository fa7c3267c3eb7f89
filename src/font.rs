//! Bitmap glyphs for the digits 0-9.
//!
//! Each glyph is a grid of `FONT_WIDTH` x `FONT_HEIGHT` cells; `#` marks a cell that is stamped
//! as a dot.

pub const FONT_WIDTH: usize = 11;
pub const FONT_HEIGHT: usize = 18;

const SET: u8 = b'#';

#[derive(Debug)]
pub struct Glyph([&'static [u8; FONT_WIDTH]; FONT_HEIGHT]);

impl Glyph {
    pub fn is_set(&self, col: usize, row: usize) -> bool {
        self.0[row][col] == SET
    }

    /// Set cells as `(col, row)`, row by row.
    pub fn dots(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..FONT_HEIGHT).flat_map(move |row| {
            (0..FONT_WIDTH)
                .filter(move |&col| self.is_set(col, row))
                .map(move |col| (col, row))
        })
    }
}

/// Glyph for `digit`, or `None` if it is not a decimal digit.
pub fn glyph(digit: u8) -> Option<&'static Glyph> {
    FONT.get(usize::from(digit))
}

#[rustfmt::skip]
static FONT: [Glyph; 10] = [
    Glyph([
        b"...#####...",
        b"..#######..",
        b".###...###.",
        b".##.....##.",
        b"##.......##",
        b"##.......##",
        b"##.......##",
        b"##.......##",
        b"##.......##",
        b"##.......##",
        b"##.......##",
        b"##.......##",
        b"##.......##",
        b"##.......##",
        b".##.....##.",
        b".###...###.",
        b"..#######..",
        b"...#####...",
    ]),
    Glyph([
        b".....##....",
        b"....###....",
        b"...####....",
        b"..##.##....",
        b".##..##....",
        b".....##....",
        b".....##....",
        b".....##....",
        b".....##....",
        b".....##....",
        b".....##....",
        b".....##....",
        b".....##....",
        b".....##....",
        b".....##....",
        b".....##....",
        b"..######...",
        b"..######...",
    ]),
    Glyph([
        b"..######...",
        b".########..",
        b"##......##.",
        b"##.......##",
        b".........##",
        b".........##",
        b"........##.",
        b".......##..",
        b"......##...",
        b".....##....",
        b"....##.....",
        b"...##......",
        b"..##.......",
        b".##........",
        b"##.........",
        b"##.........",
        b"###########",
        b"###########",
    ]),
    Glyph([
        b"..######...",
        b".########..",
        b"##......##.",
        b"........##.",
        b".........##",
        b".........##",
        b"........##.",
        b"...#####...",
        b"...######..",
        b"........##.",
        b".........##",
        b".........##",
        b".........##",
        b".........##",
        b"##......##.",
        b"##.....##..",
        b".#######...",
        b"..#####....",
    ]),
    Glyph([
        b".......##..",
        b"......###..",
        b".....####..",
        b"....##.##..",
        b"...##..##..",
        b"..##...##..",
        b".##....##..",
        b"##.....##..",
        b"##.....##..",
        b"###########",
        b"###########",
        b".......##..",
        b".......##..",
        b".......##..",
        b".......##..",
        b".......##..",
        b".......##..",
        b".......##..",
    ]),
    Glyph([
        b"###########",
        b"###########",
        b"##.........",
        b"##.........",
        b"##.........",
        b"##.........",
        b"##.#####...",
        b"#########..",
        b"##......##.",
        b".........##",
        b".........##",
        b".........##",
        b".........##",
        b".........##",
        b"##......##.",
        b"##.....##..",
        b".#######...",
        b"..#####....",
    ]),
    Glyph([
        b"....#####..",
        b"..#######..",
        b".##........",
        b".##........",
        b"##.........",
        b"##.........",
        b"##.#####...",
        b"#########..",
        b"###.....##.",
        b"##.......##",
        b"##.......##",
        b"##.......##",
        b"##.......##",
        b"##.......##",
        b".##.....##.",
        b".###...###.",
        b"..#######..",
        b"...#####...",
    ]),
    Glyph([
        b"###########",
        b"###########",
        b".........##",
        b"........##.",
        b"........##.",
        b".......##..",
        b".......##..",
        b"......##...",
        b"......##...",
        b".....##....",
        b".....##....",
        b"....##.....",
        b"....##.....",
        b"...##......",
        b"...##......",
        b"..##.......",
        b"..##.......",
        b"..##.......",
    ]),
    Glyph([
        b"...#####...",
        b"..#######..",
        b".##.....##.",
        b"##.......##",
        b"##.......##",
        b"##.......##",
        b".##.....##.",
        b"..#######..",
        b"..#######..",
        b".##.....##.",
        b"##.......##",
        b"##.......##",
        b"##.......##",
        b"##.......##",
        b"##.......##",
        b".##.....##.",
        b"..#######..",
        b"...#####...",
    ]),
    Glyph([
        b"...#####...",
        b"..#######..",
        b".##.....##.",
        b"##.......##",
        b"##.......##",
        b"##.......##",
        b"##.......##",
        b".##.....###",
        b"..#########",
        b"...#####.##",
        b".........##",
        b".........##",
        b".........##",
        b"........##.",
        b"........##.",
        b".......##..",
        b"..######...",
        b"..#####....",
    ]),
];

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_every_digit_has_a_glyph() {
        for digit in 0..10 {
            let glyph = glyph(digit).unwrap();
            assert!(glyph.dots().count() > 20, "digit {} is nearly empty", digit);
        }
        assert!(glyph(10).is_none());
    }

    #[test]
    fn test_glyphs_are_distinct() {
        let bitmaps: Vec<Vec<(usize, usize)>> =
            (0..10).map(|d| glyph(d).unwrap().dots().collect()).collect();
        for (i, a) in bitmaps.iter().enumerate() {
            for b in &bitmaps[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_dots_are_row_major() {
        let one = glyph(1).unwrap();
        let dots: Vec<_> = one.dots().take(3).collect();
        assert_eq!(dots, vec![(5, 0), (6, 0), (4, 1)]);
    }
}
