//! The pattern catalog that classifies completed raw sequences.
//!
//! Rules are bucketed by the sequence's final character, so classification
//! is an O(1) bucket lookup followed by an insertion-ordered anchored match
//! within the bucket. The catalog is built once, on first use, and shared
//! read-only across all parsers.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;

use crate::element::ControlSequenceType;

/// Finals accepted by the designate-character-set escape sequences
/// (US ASCII, UK, DEC special graphics, national replacement sets, ...).
const CHARSET_FINALS: &str = "0AB4C5RQKYE6ZH7=";

/// Parameter alphabet for CSI captures. Deliberately excludes the private
/// markers `?` and `>` so that an unprefixed rule can never swallow a
/// private-mode variant sharing its final character.
const CSI_PARAMS: &str = "[0-9;]*";

#[derive(Clone)]
struct Rule {
    kind: ControlSequenceType,
    pattern: Regex,
}

/// Immutable classification table, keyed by final character.
pub struct Catalog {
    buckets: HashMap<char, Vec<Rule>>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}

impl Catalog {
    /// The process-wide catalog, built on first use.
    pub fn shared() -> &'static Catalog {
        static CATALOG: OnceLock<Catalog> = OnceLock::new();
        CATALOG.get_or_init(Catalog::new)
    }

    /// Classify a completed raw sequence into its kind and parameters.
    ///
    /// The parameter payload is capturing group 1 of the matching rule,
    /// split on `;`. An empty or absent payload yields no parameters.
    pub fn classify(&self, raw: &str) -> (ControlSequenceType, Vec<String>) {
        let Some(final_char) = raw.chars().last() else {
            return (ControlSequenceType::Unknown, Vec::new());
        };
        let Some(rules) = self.buckets.get(&final_char) else {
            log::debug!("no rules for final character {:?} in {:?}", final_char, raw);
            return (ControlSequenceType::Unknown, Vec::new());
        };

        for rule in rules {
            if let Some(captures) = rule.pattern.captures(raw) {
                let parameters = match captures.get(1) {
                    Some(payload) if !payload.as_str().is_empty() => {
                        payload.as_str().split(';').map(str::to_owned).collect()
                    }
                    _ => Vec::new(),
                };
                return (rule.kind, parameters);
            }
        }

        log::debug!("unrecognized control sequence {:?}", raw);
        (ControlSequenceType::Unknown, Vec::new())
    }

    /// Build the full xterm rule table. Pure function of the rules below;
    /// pattern errors are programmer errors and panic.
    pub fn new() -> Catalog {
        use ControlSequenceType::*;

        let mut catalog = Catalog { buckets: HashMap::new() };

        // Single-character functions
        catalog.single(Bell, '\u{07}');
        catalog.single(Backspace, '\u{08}');
        catalog.single(CarriageReturn, '\u{0d}');
        catalog.single(ReturnTerminalStatus, '\u{05}');
        catalog.single(FormFeed, '\u{0c}');
        catalog.single(LineFeed, '\u{0a}');
        catalog.single(ShiftIn, '\u{0f}');
        catalog.single(ShiftOut, '\u{0e}');
        catalog.single(HorizontalTab, '\u{09}');
        catalog.single(VerticalTab, '\u{0b}');

        // Controls beginning with ESC
        catalog.esc(SevenBitControls, " F");
        catalog.esc(EightBitControls, " G");
        catalog.esc(SetAnsiConformanceLevel1, " L");
        catalog.esc(SetAnsiConformanceLevel2, " M");
        catalog.esc(SetAnsiConformanceLevel3, " N");
        catalog.esc(DecDoubleHeightLineTopHalf, "#3");
        catalog.esc(DecDoubleHeightLineBottomHalf, "#4");
        catalog.esc(DecSingleWidthLine, "#5");
        catalog.esc(DecDoubleWidthLine, "#6");
        catalog.esc(DecScreenAlignmentTest, "#8");
        catalog.esc(SelectDefaultCharacterSet, "%@");
        catalog.esc(SelectUtf8CharacterSet, "%G");
        catalog.designate(DesignateG0CharacterSetVt100, '(');
        catalog.designate(DesignateG1CharacterSetVt100, ')');
        catalog.designate(DesignateG2CharacterSetVt220, '*');
        catalog.designate(DesignateG3CharacterSetVt220, '+');
        catalog.designate(DesignateG1CharacterSetVt300, '-');
        catalog.designate(DesignateG2CharacterSetVt300, '.');
        catalog.designate(DesignateG3CharacterSetVt300, '/');
        catalog.esc(BackIndex, "6");
        catalog.esc(SaveCursor, "7");
        catalog.esc(RestoreCursor, "8");
        catalog.esc(ForwardIndex, "9");
        catalog.esc(ApplicationKeypad, "=");
        catalog.esc(NormalKeypad, ">");
        catalog.esc(CursorToLowerLeftCornerOfScreen, "F");
        catalog.esc(FullReset, "c");
        catalog.esc(MemoryLock, "l");
        catalog.esc(MemoryUnlock, "m");
        catalog.esc(InvokeG2CharacterSetAsGl, "n");
        catalog.esc(InvokeG3CharacterSetAsGl, "o");
        catalog.esc(InvokeG3CharacterSetAsGr, "|");
        catalog.esc(InvokeG2CharacterSetAsGr, "}");
        catalog.esc(InvokeG1CharacterSetAsGr, "~");

        // Device control strings. The intermediate-prefixed rules come
        // first: the user-defined-keys rule has no intermediates and its
        // payload capture would otherwise shadow them.
        catalog.dcs(RequestStatusString, "$q");
        catalog.dcs(SetTermcapData, "+p");
        catalog.dcs(RequestTermcapString, "+q");
        catalog.dcs(UserDefinedKeys, "");

        // Functions beginning with CSI
        catalog.csi(InsertCharacters, "", "@");
        catalog.csi(CursorUp, "", "A");
        catalog.csi(CursorDown, "", "B");
        catalog.csi(CursorForward, "", "C");
        catalog.csi(CursorBackward, "", "D");
        catalog.csi(CursorNextLine, "", "E");
        catalog.csi(CursorPrecedingLine, "", "F");
        catalog.csi(CursorCharacterAbsolute, "", "G");
        catalog.csi(CursorPosition, "", "H");
        catalog.csi(CursorForwardTabulation, "", "I");
        catalog.csi(EraseInDisplayEd, "", "J");
        catalog.csi(EraseInDisplayDecsed, "?", "J");
        catalog.csi(EraseInLineEl, "", "K");
        catalog.csi(EraseInLineDecsel, "?", "K");
        catalog.csi(InsertLines, "", "L");
        catalog.csi(DeleteLines, "", "M");
        catalog.csi(DeleteCharacters, "", "P");
        catalog.csi(ScrollUpLines, "", "S");
        // A lone scroll count; the multi-parameter form of the same final
        // belongs to highlight mouse tracking below.
        catalog.csi_with(ScrollDownLines, "", "[0-9]*", "T");
        catalog.csi(InitiateHighlightMouseTracking, "", "T");
        catalog.csi(ResetTitleModesFeatures, ">", "T");
        catalog.csi(EraseCharacters, "", "X");
        catalog.csi(CursorBackwardTabulation, "", "Z");
        catalog.csi(CharacterPositionAbsolute, "", "`");
        catalog.csi(CharacterPositionRelative, "", "a");
        catalog.csi(RepeatPrecedingGraphicCharacter, "", "b");
        catalog.csi(SendDeviceAttributesPrimary, "", "c");
        catalog.csi(SendDeviceAttributesSecondary, ">", "c");
        catalog.csi(LinePositionAbsolute, "", "d");
        catalog.csi(LinePositionRelative, "", "e");
        catalog.csi(HorizontalAndVerticalPosition, "", "f");
        catalog.csi(TabClear, "", "g");
        catalog.csi(SetMode, "", "h");
        catalog.csi(DecPrivateModeSet, "?", "h");
        catalog.csi(MediaCopy, "", "i");
        catalog.csi(MediaCopyDec, "?", "i");
        catalog.csi(ResetMode, "", "l");
        catalog.csi(DecPrivateModeReset, "?", "l");
        catalog.csi(CharacterAttributes, "", "m");
        catalog.csi(SetKeyModifierOptions, ">", "m");
        catalog.csi(DeviceStatusReport, "", "n");
        catalog.csi(DisableKeyModifierOptions, ">", "n");
        catalog.csi(DeviceStatusReportDec, "?", "n");
        catalog.csi(SetPointerMode, ">", "p");
        catalog.csi(SoftTerminalReset, "", "!p");
        catalog.csi(SetConformanceLevel, "", "\"p");
        catalog.csi(LoadLeds, "", "q");
        catalog.csi(SetCursorStyle, "", " q");
        catalog.csi(SelectCharacterProtectionAttribute, "", "\"q");
        catalog.csi(SetScrollingRegion, "", "r");
        catalog.csi(RestoreDecPrivateModeValues, "?", "r");
        catalog.csi(ChangeAttributesInRectangularArea, "", "$r");
        catalog.csi(SaveCursorAnsiSys, "", "s");
        catalog.csi(SaveDecPrivateModeValues, "?", "s");
        catalog.csi(WindowManipulation, "", "t");
        catalog.csi(SetTitleModesFeatures, ">", "t");
        catalog.csi(SetWarningBellVolume, "", " t");
        catalog.csi(ReverseAttributesInRectangularArea, "", "$t");
        catalog.csi(RestoreCursorAnsiSys, "", "u");
        catalog.csi(SetMarginBellVolume, "", " u");
        catalog.csi(CopyRectangularArea, "", "$v");
        catalog.csi(EnableFilterRectangle, "", "'w");
        catalog.csi(RequestTerminalParameters, "", "x");
        catalog.csi(SelectAttributeChangeExtent, "", "*x");
        catalog.csi(FillRectangularArea, "", "$x");
        catalog.csi(EnableLocatorReporting, "", "'z");
        catalog.csi(EraseRectangularArea, "", "$z");
        catalog.csi(SelectLocatorEvents, "", "'{");
        catalog.csi(SelectiveEraseRectangularArea, "", "${");
        catalog.csi(RequestLocatorPosition, "", "'|");
        catalog.csi(InsertColumns, "", "'}");
        catalog.csi(DeleteColumns, "", "'~");

        // Operating system commands, one rule per terminator form
        catalog.osc(SetTextParameters, "\u{07}");
        catalog.osc(SetTextParameters, "\u{9c}");
        catalog.osc(SetTextParameters, "\u{1b}\\");

        // Final Term shell-integration extension. Arguments are not
        // restricted to the CSI parameter alphabet, so the capture is
        // payload-shaped like the string functions above.
        catalog.csi_with(FinalTerm, "?", ".*", "Y");

        catalog
    }

    fn add(&mut self, bucket: char, kind: ControlSequenceType, pattern: &str) {
        let pattern = Regex::new(pattern)
            .unwrap_or_else(|err| panic!("invalid sequence pattern {:?}: {}", pattern, err));
        self.buckets.entry(bucket).or_default().push(Rule { kind, pattern });
    }

    /// A literal single-character function.
    fn single(&mut self, kind: ControlSequenceType, c: char) {
        self.add(c, kind, &format!("^{}", regex::escape(&c.to_string())));
    }

    /// `ESC finals`, bucketed on the last character of `finals`.
    fn esc(&mut self, kind: ControlSequenceType, finals: &str) {
        let bucket = finals.chars().last().unwrap();
        self.add(bucket, kind, &format!("^\u{1b}{}", regex::escape(finals)));
    }

    /// `ESC intermediate F` for every charset final F; one shared pattern
    /// registered in each final's bucket.
    fn designate(&mut self, kind: ControlSequenceType, intermediate: char) {
        let source = format!(
            "^\u{1b}{}[{}]",
            regex::escape(&intermediate.to_string()),
            CHARSET_FINALS
        );
        let pattern = Regex::new(&source)
            .unwrap_or_else(|err| panic!("invalid sequence pattern {:?}: {}", source, err));
        for final_char in CHARSET_FINALS.chars() {
            self.buckets
                .entry(final_char)
                .or_default()
                .push(Rule { kind, pattern: pattern.clone() });
        }
    }

    /// `(ESC P | 0x90) intermediates payload ST`, bucketed on ST.
    fn dcs(&mut self, kind: ControlSequenceType, intermediates: &str) {
        self.add(
            '\u{9c}',
            kind,
            &format!("(?s)^(?:\u{1b}P|\u{90}){}(.*)\u{9c}", regex::escape(intermediates)),
        );
    }

    /// `(ESC [ | 0x9B) prefix params finals`, bucketed on the last
    /// character of `finals`.
    fn csi(&mut self, kind: ControlSequenceType, prefix: &str, finals: &str) {
        self.csi_with(kind, prefix, CSI_PARAMS, finals);
    }

    fn csi_with(&mut self, kind: ControlSequenceType, prefix: &str, params: &str, finals: &str) {
        let bucket = finals.chars().last().unwrap();
        self.add(
            bucket,
            kind,
            &format!(
                "^(?:\u{1b}\\[|\u{9b}){}({}){}",
                regex::escape(prefix),
                params,
                regex::escape(finals)
            ),
        );
    }

    /// `(ESC ] | 0x9D) payload terminator`, bucketed on the terminator's
    /// last character.
    fn osc(&mut self, kind: ControlSequenceType, terminator: &str) {
        let bucket = terminator.chars().last().unwrap();
        self.add(
            bucket,
            kind,
            &format!("(?s)^(?:\u{1b}\\]|\u{9d})(.*){}", regex::escape(terminator)),
        );
    }
}

/// Classify `raw` against the shared catalog.
pub fn classify(raw: &str) -> (ControlSequenceType, Vec<String>) {
    Catalog::shared().classify(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ControlSequenceType::*;

    fn kind_of(raw: &str) -> ControlSequenceType {
        classify(raw).0
    }

    fn params_of(raw: &str) -> Vec<String> {
        classify(raw).1
    }

    #[test]
    fn test_single_character_functions() {
        assert_eq!(kind_of("\u{7}"), Bell);
        assert_eq!(kind_of("\u{8}"), Backspace);
        assert_eq!(kind_of("\r"), CarriageReturn);
        assert_eq!(kind_of("\n"), LineFeed);
        assert_eq!(kind_of("\u{5}"), ReturnTerminalStatus);
        assert!(params_of("\u{7}").is_empty());
    }

    #[test]
    fn test_esc_sequences() {
        assert_eq!(kind_of("\u{1b}7"), SaveCursor);
        assert_eq!(kind_of("\u{1b}8"), RestoreCursor);
        assert_eq!(kind_of("\u{1b}c"), FullReset);
        assert_eq!(kind_of("\u{1b} F"), SevenBitControls);
        assert_eq!(kind_of("\u{1b}#8"), DecScreenAlignmentTest);
        assert_eq!(kind_of("\u{1b}%G"), SelectUtf8CharacterSet);
        assert_eq!(kind_of("\u{1b}="), ApplicationKeypad);
        assert_eq!(kind_of("\u{1b}~"), InvokeG1CharacterSetAsGr);
    }

    #[test]
    fn test_designate_character_set() {
        assert_eq!(kind_of("\u{1b}(B"), DesignateG0CharacterSetVt100);
        assert_eq!(kind_of("\u{1b})0"), DesignateG1CharacterSetVt100);
        assert_eq!(kind_of("\u{1b}*K"), DesignateG2CharacterSetVt220);
        assert_eq!(kind_of("\u{1b}-A"), DesignateG1CharacterSetVt300);
        assert_eq!(kind_of("\u{1b}/="), DesignateG3CharacterSetVt300);
        assert!(params_of("\u{1b}(B").is_empty());
    }

    #[test]
    fn test_esc_final_shared_with_charset() {
        // ESC 7 is save-cursor even though 7 is also a charset final
        assert_eq!(kind_of("\u{1b}7"), SaveCursor);
        assert_eq!(kind_of("\u{1b}(7"), DesignateG0CharacterSetVt100);
        assert_eq!(kind_of("\u{1b}="), ApplicationKeypad);
        assert_eq!(kind_of("\u{1b}+="), DesignateG3CharacterSetVt220);
    }

    #[test]
    fn test_dcs_sequences() {
        assert_eq!(classify("\u{1b}P$q\"p\u{9c}"), (RequestStatusString, vec!["\"p".to_string()]));
        assert_eq!(kind_of("\u{90}+p1+r616263\u{9c}"), SetTermcapData);
        assert_eq!(kind_of("\u{1b}P+q544e\u{9c}"), RequestTermcapString);
        assert_eq!(
            classify("\u{1b}P1;0|17/ab\u{9c}"),
            (UserDefinedKeys, vec!["1".to_string(), "0|17/ab".to_string()])
        );
    }

    #[test]
    fn test_csi_parameters() {
        assert_eq!(
            classify("\u{1b}[38;5;196m"),
            (CharacterAttributes, vec!["38".to_string(), "5".to_string(), "196".to_string()])
        );
        assert_eq!(classify("\u{1b}[m"), (CharacterAttributes, vec![]));
        assert_eq!(
            classify("\u{1b}[;5H"),
            (CursorPosition, vec!["".to_string(), "5".to_string()])
        );
        assert_eq!(classify("\u{9b}5A"), (CursorUp, vec!["5".to_string()]));
    }

    #[test]
    fn test_csi_private_marker_disambiguation() {
        assert_eq!(kind_of("\u{1b}[2J"), EraseInDisplayEd);
        assert_eq!(kind_of("\u{1b}[?2J"), EraseInDisplayDecsed);
        assert_eq!(kind_of("\u{1b}[K"), EraseInLineEl);
        assert_eq!(kind_of("\u{1b}[?1K"), EraseInLineDecsel);
        assert_eq!(classify("\u{1b}[?25h"), (DecPrivateModeSet, vec!["25".to_string()]));
        assert_eq!(classify("\u{1b}[?25l"), (DecPrivateModeReset, vec!["25".to_string()]));
        assert_eq!(kind_of("\u{1b}[c"), SendDeviceAttributesPrimary);
        assert_eq!(kind_of("\u{1b}[>c"), SendDeviceAttributesSecondary);
        assert_eq!(kind_of("\u{1b}[6n"), DeviceStatusReport);
        assert_eq!(kind_of("\u{1b}[?6n"), DeviceStatusReportDec);
    }

    #[test]
    fn test_csi_intermediate_disambiguation() {
        assert_eq!(kind_of("\u{1b}[!p"), SoftTerminalReset);
        assert_eq!(kind_of("\u{1b}[61;1\"p"), SetConformanceLevel);
        assert_eq!(kind_of("\u{1b}[0q"), LoadLeds);
        assert_eq!(kind_of("\u{1b}[4 q"), SetCursorStyle);
        assert_eq!(kind_of("\u{1b}[1\"q"), SelectCharacterProtectionAttribute);
        assert_eq!(kind_of("\u{1b}[1;24r"), SetScrollingRegion);
        assert_eq!(kind_of("\u{1b}[?1049r"), RestoreDecPrivateModeValues);
        assert_eq!(kind_of("\u{1b}[1;1;5;10;7$r"), ChangeAttributesInRectangularArea);
        assert_eq!(kind_of("\u{1b}[s"), SaveCursorAnsiSys);
        assert_eq!(kind_of("\u{1b}[?47s"), SaveDecPrivateModeValues);
        assert_eq!(kind_of("\u{1b}[8;24;80t"), WindowManipulation);
        assert_eq!(kind_of("\u{1b}[>0;1t"), SetTitleModesFeatures);
        assert_eq!(kind_of("\u{1b}[3 t"), SetWarningBellVolume);
        assert_eq!(kind_of("\u{1b}[5'}"), InsertColumns);
        assert_eq!(kind_of("\u{1b}[5'~"), DeleteColumns);
    }

    #[test]
    fn test_scroll_down_vs_highlight_tracking() {
        // One parameter scrolls; the five-parameter form starts tracking
        assert_eq!(classify("\u{1b}[5T"), (ScrollDownLines, vec!["5".to_string()]));
        assert_eq!(classify("\u{1b}[T"), (ScrollDownLines, vec![]));
        assert_eq!(
            kind_of("\u{1b}[1;10;10;20;20T"),
            InitiateHighlightMouseTracking
        );
        assert_eq!(kind_of("\u{1b}[>1T"), ResetTitleModesFeatures);
    }

    #[test]
    fn test_osc_terminators() {
        let bel = classify("\u{1b}]0;window title\u{7}");
        assert_eq!(bel, (SetTextParameters, vec!["0".to_string(), "window title".to_string()]));

        let st = classify("\u{9d}2;title\u{9c}");
        assert_eq!(st.0, SetTextParameters);
        assert_eq!(st.1, vec!["2".to_string(), "title".to_string()]);

        let esc_st = classify("\u{1b}]2;title\u{1b}\\");
        assert_eq!(esc_st.0, SetTextParameters);
        assert_eq!(esc_st.1, vec!["2".to_string(), "title".to_string()]);
    }

    #[test]
    fn test_final_term() {
        assert_eq!(classify("\u{1b}[?1Y"), (FinalTerm, vec!["1".to_string()]));
        assert_eq!(
            classify("\u{9b}?6;0.5Y"),
            (FinalTerm, vec!["6".to_string(), "0.5".to_string()])
        );
    }

    #[test]
    fn test_unknown_sequences() {
        // ESC D (IND) terminates the splitter but has no catalog entry
        assert_eq!(classify("\u{1b}D"), (Unknown, vec![]));
        // Final character with no bucket at all
        assert_eq!(classify("\u{1b}[5;1%"), (Unknown, vec![]));
        // Bucket exists but nothing matches
        assert_eq!(classify("\u{1b}q"), (Unknown, vec![]));
        assert_eq!(classify(""), (Unknown, vec![]));
    }
}
