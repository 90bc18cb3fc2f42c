//! Compass-rose direction labels
//!
//! Turns a heading into the glyph sequence shown under the dial: up to two
//! compass points (one of east/west, one of north/south) followed by the
//! whole-degree value as individual digits and a degree sign.

use core::fmt;

use crate::math::normalize_degrees;

/// One of the four cardinal compass points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompassPoint {
    North,
    South,
    East,
    West,
}

impl CompassPoint {
    /// Single-letter abbreviation
    pub fn letter(self) -> char {
        match self {
            CompassPoint::North => 'N',
            CompassPoint::South => 'S',
            CompassPoint::East => 'E',
            CompassPoint::West => 'W',
        }
    }
}

/// A glyph in the rendered label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Glyph {
    Point(CompassPoint),
    /// Decimal digit, 0-9
    Digit(u8),
    Degree,
}

/// Direction label for one heading
///
/// # Example
/// ```
/// use compass_heading::direction::{CompassPoint, DirectionLabel};
///
/// let label = DirectionLabel::compose(45.0, false);
/// assert_eq!(label.points(), &[CompassPoint::North, CompassPoint::East]);
/// assert_eq!(label.to_string(), "NE 45°");
///
/// // Alternate ordering puts east/west first
/// let label = DirectionLabel::compose(45.0, true);
/// assert_eq!(label.points(), &[CompassPoint::East, CompassPoint::North]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectionLabel {
    points: Vec<CompassPoint>,
    degrees: u16,
}

impl DirectionLabel {
    /// Compose the label for an azimuth in degrees (0 = north, clockwise)
    ///
    /// Bands are open intervals, so a heading exactly on a boundary belongs
    /// to neither neighbour band.
    pub fn compose(azimuth: f32, use_alternate_ordering: bool) -> Self {
        let azimuth = normalize_degrees(azimuth);

        let east_west = if azimuth > 22.5 && azimuth < 157.5 {
            Some(CompassPoint::East)
        } else if azimuth > 202.5 && azimuth < 337.5 {
            Some(CompassPoint::West)
        } else {
            None
        };

        let north_south = if azimuth > 112.5 && azimuth < 247.5 {
            Some(CompassPoint::South)
        } else if azimuth < 67.5 || azimuth > 292.5 {
            Some(CompassPoint::North)
        } else {
            None
        };

        let points = if use_alternate_ordering {
            [east_west, north_south]
        } else {
            [north_south, east_west]
        };

        Self {
            points: points.into_iter().flatten().collect(),
            degrees: azimuth as u16,
        }
    }

    /// Compose the label for a dial target heading
    ///
    /// The dial turns against the device, so the azimuth shown is the
    /// negated target.
    pub fn from_target(target_heading: f32, use_alternate_ordering: bool) -> Self {
        Self::compose(-target_heading, use_alternate_ordering)
    }

    /// Compass points in display order
    pub fn points(&self) -> &[CompassPoint] {
        &self.points
    }

    /// Whole degrees shown, truncated
    pub fn degrees(&self) -> u16 {
        self.degrees
    }

    /// Full glyph sequence: points, then degree digits, then the degree sign
    pub fn glyphs(&self) -> Vec<Glyph> {
        let mut glyphs: Vec<Glyph> = self.points.iter().copied().map(Glyph::Point).collect();
        glyphs.extend(degree_glyphs(self.degrees));
        glyphs
    }
}

impl fmt::Display for DirectionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for point in &self.points {
            write!(f, "{}", point.letter())?;
        }
        if !self.points.is_empty() {
            f.write_str(" ")?;
        }
        write!(f, "{}°", self.degrees)
    }
}

/// Decimal digit glyphs for a whole-degree value, without leading zeros,
/// terminated by a degree sign
///
/// # Example
/// ```
/// use compass_heading::direction::{Glyph, degree_glyphs};
///
/// assert_eq!(degree_glyphs(7), vec![Glyph::Digit(7), Glyph::Degree]);
/// assert_eq!(
///     degree_glyphs(305),
///     vec![Glyph::Digit(3), Glyph::Digit(0), Glyph::Digit(5), Glyph::Degree]
/// );
/// ```
pub fn degree_glyphs(degrees: u16) -> Vec<Glyph> {
    let mut glyphs = Vec::with_capacity(4);
    let mut remaining = degrees;
    let mut shown = false;

    if remaining >= 100 {
        glyphs.push(Glyph::Digit((remaining / 100) as u8));
        remaining %= 100;
        shown = true;
    }
    if remaining >= 10 || shown {
        glyphs.push(Glyph::Digit((remaining / 10) as u8));
        remaining %= 10;
    }
    glyphs.push(Glyph::Digit(remaining as u8));
    glyphs.push(Glyph::Degree);

    glyphs
}
