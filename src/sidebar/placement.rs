use super::SideBarLocation;
use crate::layout::LayoutBorderLocations;

/// The side bar a panel should minimize to, given the layout borders its item touches and its
/// aspect ratio (width / height).
///
/// Wide panels go to horizontal bars, tall panels to vertical ones; a panel touching borders
/// goes to a bar on a border it touches, preferring the bottom and the right.
pub fn preferred_location(borders: LayoutBorderLocations, aspect_ratio: f32) -> SideBarLocation {
    type B = LayoutBorderLocations;
    let is_wide = aspect_ratio > 1.0;

    if borders == B::ALL {
        return if is_wide {
            SideBarLocation::South
        } else {
            SideBarLocation::East
        };
    }

    if borders.count() == 3 {
        let missing = !borders;
        return match missing {
            m if m == B::NORTH => SideBarLocation::South,
            m if m == B::EAST => SideBarLocation::West,
            m if m == B::WEST => SideBarLocation::East,
            _ => SideBarLocation::North,
        };
    }

    if borders == B::VERTICALS {
        return SideBarLocation::South;
    }
    if borders == B::HORIZONTALS {
        return SideBarLocation::East;
    }

    let corner = |horizontal: SideBarLocation, vertical: SideBarLocation| {
        if is_wide { horizontal } else { vertical }
    };
    if borders == (B::WEST | B::SOUTH) {
        return corner(SideBarLocation::South, SideBarLocation::West);
    }
    if borders == (B::EAST | B::SOUTH) {
        return corner(SideBarLocation::South, SideBarLocation::East);
    }
    if borders == (B::WEST | B::NORTH) {
        return corner(SideBarLocation::North, SideBarLocation::West);
    }
    if borders == (B::EAST | B::NORTH) {
        return corner(SideBarLocation::North, SideBarLocation::East);
    }

    if borders == B::NORTH {
        return SideBarLocation::North;
    }
    if borders == B::EAST {
        return SideBarLocation::East;
    }
    if borders == B::WEST {
        return SideBarLocation::West;
    }
    if borders == B::SOUTH {
        return SideBarLocation::South;
    }

    // Not touching any border.
    if is_wide {
        SideBarLocation::South
    } else {
        SideBarLocation::West
    }
}
