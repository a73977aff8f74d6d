#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineDefFlags {
    /// Players and monsters cannot cross this line. Note that
    /// if there is no sector on the other side, they can't go through the line
    /// anyway, regardless of the flags
    Blocking = 1,
    /// Monsters cannot cross this line
    BlockMonsters = 1 << 1,
    /// The linedef's two sidedefs can have "-" as a texture,
    /// which in this case means "transparent". If this flag is not set, the
    /// sidedefs can't be transparent. A side effect of this flag is that if
    /// it is set, then gunfire (pistol, shotgun, chaingun) can go through it
    TwoSided = 1 << 2,
    UnpegTop = 1 << 3,
    UnpegBottom = 1 << 4,
    /// On the automap, this line appears in red like a normal
    /// solid wall that has nothing on the other side
    Secret = 1 << 5,
    /// For purposes of monsters hearing sounds and thus
    /// becoming alerted
    BlockSound = 1 << 6,
    /// The line is not shown on the regular automap
    DontDraw = 1 << 7,
    /// The line is always shown on the automap
    Draw = 1 << 8,
    /// Using this special line lets the use trace carry on to the lines
    /// behind it
    PassUse = 1 << 9,
}
