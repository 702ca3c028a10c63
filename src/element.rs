//! Stream elements produced by the parser.
//!
//! A terminal output stream is an append-only sequence of elements: plain
//! text runs and classified control sequences. Elements are immutable once
//! constructed.

use serde::{Deserialize, Serialize};

/// One element of the parsed output stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StreamElement {
    /// A maximal run of printable characters.
    Text { text: String },

    /// A classified control function, with the verbatim characters of the
    /// sequence (inducer and terminator included) and its parameters.
    ControlSequence {
        raw_text: String,
        kind: ControlSequenceType,
        parameters: Vec<String>,
    },
}

impl StreamElement {
    pub fn is_text(&self) -> bool {
        matches!(self, StreamElement::Text { .. })
    }

    pub fn is_control_sequence(&self) -> bool {
        matches!(self, StreamElement::ControlSequence { .. })
    }

    /// The verbatim characters this element was parsed from.
    pub fn raw_text(&self) -> &str {
        match self {
            StreamElement::Text { text } => text,
            StreamElement::ControlSequence { raw_text, .. } => raw_text,
        }
    }

    /// Parameter at `index` parsed as a decimal integer. Returns `default`
    /// if the parameter is absent; a present but non-numeric parameter
    /// parses as 0.
    pub fn numeric_parameter(&self, index: usize, default: i32) -> i32 {
        match self {
            StreamElement::ControlSequence { parameters, .. } => match parameters.get(index) {
                Some(value) => value.parse().unwrap_or(0),
                None => default,
            },
            StreamElement::Text { .. } => default,
        }
    }

    /// Parameter at `index` as text, or `default` if absent.
    pub fn text_parameter<'a>(&'a self, index: usize, default: &'a str) -> &'a str {
        match self {
            StreamElement::ControlSequence { parameters, .. } => {
                parameters.get(index).map(String::as_str).unwrap_or(default)
            }
            StreamElement::Text { .. } => default,
        }
    }
}

/// The terminal control functions recognized by the classifier.
///
/// Covers the ten single-character C0 functions, the xterm ESC repertoire,
/// DCS and OSC strings, the full xterm CSI table, and the Final Term
/// vendor extension. A completed sequence whose final character has no
/// catalog entry, or that matches no pattern in its bucket, is `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ControlSequenceType {
    Unknown,

    // Single-character functions
    Bell,
    Backspace,
    CarriageReturn,
    ReturnTerminalStatus,
    FormFeed,
    LineFeed,
    ShiftIn,
    ShiftOut,
    HorizontalTab,
    VerticalTab,

    // Controls beginning with ESC
    /// ESC SP F
    SevenBitControls,
    /// ESC SP G
    EightBitControls,
    /// ESC SP L
    SetAnsiConformanceLevel1,
    /// ESC SP M
    SetAnsiConformanceLevel2,
    /// ESC SP N
    SetAnsiConformanceLevel3,
    /// ESC # 3 (DECDHL)
    DecDoubleHeightLineTopHalf,
    /// ESC # 4 (DECDHL)
    DecDoubleHeightLineBottomHalf,
    /// ESC # 5 (DECSWL)
    DecSingleWidthLine,
    /// ESC # 6 (DECDWL)
    DecDoubleWidthLine,
    /// ESC # 8 (DECALN)
    DecScreenAlignmentTest,
    /// ESC % @
    SelectDefaultCharacterSet,
    /// ESC % G
    SelectUtf8CharacterSet,
    /// ESC ( C
    DesignateG0CharacterSetVt100,
    /// ESC ) C
    DesignateG1CharacterSetVt100,
    /// ESC * C
    DesignateG2CharacterSetVt220,
    /// ESC + C
    DesignateG3CharacterSetVt220,
    /// ESC - C
    DesignateG1CharacterSetVt300,
    /// ESC . C
    DesignateG2CharacterSetVt300,
    /// ESC / C
    DesignateG3CharacterSetVt300,
    /// ESC 6 (DECBI)
    BackIndex,
    /// ESC 7 (DECSC)
    SaveCursor,
    /// ESC 8 (DECRC)
    RestoreCursor,
    /// ESC 9 (DECFI)
    ForwardIndex,
    /// ESC = (DECKPAM)
    ApplicationKeypad,
    /// ESC > (DECKPNM)
    NormalKeypad,
    /// ESC F
    CursorToLowerLeftCornerOfScreen,
    /// ESC c (RIS)
    FullReset,
    /// ESC l
    MemoryLock,
    /// ESC m
    MemoryUnlock,
    /// ESC n (LS2)
    InvokeG2CharacterSetAsGl,
    /// ESC o (LS3)
    InvokeG3CharacterSetAsGl,
    /// ESC | (LS3R)
    InvokeG3CharacterSetAsGr,
    /// ESC } (LS2R)
    InvokeG2CharacterSetAsGr,
    /// ESC ~ (LS1R)
    InvokeG1CharacterSetAsGr,

    // Device control strings
    /// DCS Ps ; Ps | Pt ST (DECUDK)
    UserDefinedKeys,
    /// DCS $ q Pt ST (DECRQSS)
    RequestStatusString,
    /// DCS + p Pt ST
    SetTermcapData,
    /// DCS + q Pt ST
    RequestTermcapString,

    // Functions beginning with CSI
    /// CSI Ps @ (ICH)
    InsertCharacters,
    /// CSI Ps A (CUU)
    CursorUp,
    /// CSI Ps B (CUD)
    CursorDown,
    /// CSI Ps C (CUF)
    CursorForward,
    /// CSI Ps D (CUB)
    CursorBackward,
    /// CSI Ps E (CNL)
    CursorNextLine,
    /// CSI Ps F (CPL)
    CursorPrecedingLine,
    /// CSI Ps G (CHA)
    CursorCharacterAbsolute,
    /// CSI Ps ; Ps H (CUP)
    CursorPosition,
    /// CSI Ps I (CHT)
    CursorForwardTabulation,
    /// CSI Ps J (ED)
    EraseInDisplayEd,
    /// CSI ? Ps J (DECSED)
    EraseInDisplayDecsed,
    /// CSI Ps K (EL)
    EraseInLineEl,
    /// CSI ? Ps K (DECSEL)
    EraseInLineDecsel,
    /// CSI Ps L (IL)
    InsertLines,
    /// CSI Ps M (DL)
    DeleteLines,
    /// CSI Ps P (DCH)
    DeleteCharacters,
    /// CSI Ps S (SU)
    ScrollUpLines,
    /// CSI Ps T (SD)
    ScrollDownLines,
    /// CSI Ps ; Ps ; Ps ; Ps ; Ps T
    InitiateHighlightMouseTracking,
    /// CSI > Ps T
    ResetTitleModesFeatures,
    /// CSI Ps X (ECH)
    EraseCharacters,
    /// CSI Ps Z (CBT)
    CursorBackwardTabulation,
    /// CSI Ps ` (HPA)
    CharacterPositionAbsolute,
    /// CSI Ps a (HPR)
    CharacterPositionRelative,
    /// CSI Ps b (REP)
    RepeatPrecedingGraphicCharacter,
    /// CSI Ps c (DA)
    SendDeviceAttributesPrimary,
    /// CSI > Ps c (DA2)
    SendDeviceAttributesSecondary,
    /// CSI Ps d (VPA)
    LinePositionAbsolute,
    /// CSI Ps e (VPR)
    LinePositionRelative,
    /// CSI Ps ; Ps f (HVP)
    HorizontalAndVerticalPosition,
    /// CSI Ps g (TBC)
    TabClear,
    /// CSI Pm h (SM)
    SetMode,
    /// CSI ? Pm h (DECSET)
    DecPrivateModeSet,
    /// CSI Pm i (MC)
    MediaCopy,
    /// CSI ? Pm i (MC, DEC-specific)
    MediaCopyDec,
    /// CSI Pm l (RM)
    ResetMode,
    /// CSI ? Pm l (DECRST)
    DecPrivateModeReset,
    /// CSI Pm m (SGR)
    CharacterAttributes,
    /// CSI > Ps ; Ps m
    SetKeyModifierOptions,
    /// CSI Ps n (DSR)
    DeviceStatusReport,
    /// CSI > Ps n
    DisableKeyModifierOptions,
    /// CSI ? Ps n (DSR, DEC-specific)
    DeviceStatusReportDec,
    /// CSI > Ps p
    SetPointerMode,
    /// CSI ! p (DECSTR)
    SoftTerminalReset,
    /// CSI Ps ; Ps " p (DECSCL)
    SetConformanceLevel,
    /// CSI Ps q (DECLL)
    LoadLeds,
    /// CSI Ps SP q (DECSCUSR)
    SetCursorStyle,
    /// CSI Ps " q (DECSCA)
    SelectCharacterProtectionAttribute,
    /// CSI Ps ; Ps r (DECSTBM)
    SetScrollingRegion,
    /// CSI ? Pm r
    RestoreDecPrivateModeValues,
    /// CSI Pt ; Pl ; Pb ; Pr ; Ps $ r (DECCARA)
    ChangeAttributesInRectangularArea,
    /// CSI s (SCOSC)
    SaveCursorAnsiSys,
    /// CSI ? Pm s
    SaveDecPrivateModeValues,
    /// CSI Ps ; Ps ; Ps t
    WindowManipulation,
    /// CSI > Ps ; Ps t
    SetTitleModesFeatures,
    /// CSI Ps SP t (DECSWBV)
    SetWarningBellVolume,
    /// CSI Pt ; Pl ; Pb ; Pr ; Ps $ t (DECRARA)
    ReverseAttributesInRectangularArea,
    /// CSI u (SCORC)
    RestoreCursorAnsiSys,
    /// CSI Ps SP u (DECSMBV)
    SetMarginBellVolume,
    /// CSI Pt ; Pl ; Pb ; Pr ; Pp ; Pt ; Pl ; Pp $ v (DECCRA)
    CopyRectangularArea,
    /// CSI Pt ; Pl ; Pb ; Pr ' w (DECEFR)
    EnableFilterRectangle,
    /// CSI Ps x (DECREQTPARM)
    RequestTerminalParameters,
    /// CSI Ps * x (DECSACE)
    SelectAttributeChangeExtent,
    /// CSI Pc ; Pt ; Pl ; Pb ; Pr $ x (DECFRA)
    FillRectangularArea,
    /// CSI Ps ' z (DECELR)
    EnableLocatorReporting,
    /// CSI Pt ; Pl ; Pb ; Pr $ z (DECERA)
    EraseRectangularArea,
    /// CSI Pm ' { (DECSLE)
    SelectLocatorEvents,
    /// CSI Pt ; Pl ; Pb ; Pr $ { (DECSERA)
    SelectiveEraseRectangularArea,
    /// CSI Ps ' | (DECRQLP)
    RequestLocatorPosition,
    /// CSI Pm ' } (DECIC)
    InsertColumns,
    /// CSI Pm ' ~ (DECDC)
    DeleteColumns,

    // Operating system commands
    /// OSC Ps ; Pt BEL, OSC Ps ; Pt ST
    SetTextParameters,

    // Vendor extension emitted by shell integration
    /// CSI ? Ps ; Ps ; ... Y
    FinalTerm,
}
