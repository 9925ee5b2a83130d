//! Property aliases and the property -> value-rule registry.
//!
//! Every supported CSS property maps to one [`PropertyRule`], whose
//! [`ValueType`] selects the validator branch. The registry is built once on
//! first use and shared read-only afterwards.

use serde::Serialize;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Value category declared for a property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValueType {
    Length,
    Color,
    Number,
    Integer,
    Time,
    Angle,
    Keyword,
    Function,
    KeywordOrFunction,
    Font,
    FontFamily,
    SpecialShorthand,
    Background,
    Transition,
    Animation,
    Content,
    Shadow,
    Filter,
    BorderRadius,
    Complex,
    String,
    Image,
    AspectRatio,
}

impl ValueType {
    pub fn name(&self) -> &'static str {
        match self {
            ValueType::Length => "length",
            ValueType::Color => "color",
            ValueType::Number => "number",
            ValueType::Integer => "integer",
            ValueType::Time => "time",
            ValueType::Angle => "angle",
            ValueType::Keyword => "keyword",
            ValueType::Function => "function",
            ValueType::KeywordOrFunction => "keyword-or-function",
            ValueType::Font => "font",
            ValueType::FontFamily => "font-family",
            ValueType::SpecialShorthand => "special-shorthand",
            ValueType::Background => "background",
            ValueType::Transition => "transition",
            ValueType::Animation => "animation",
            ValueType::Content => "content",
            ValueType::Shadow => "shadow",
            ValueType::Filter => "filter",
            ValueType::BorderRadius => "border-radius",
            ValueType::Complex => "complex",
            ValueType::String => "string",
            ValueType::Image => "image",
            ValueType::AspectRatio => "aspect-ratio",
        }
    }
}

/// How many values a property accepts and how they are joined on output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Multiplicity {
    Single,
    /// Up to `max` values, space-joined
    SpaceList { max: usize },
    /// Any number of values, comma-joined
    CommaList,
}

/// Validation rule for one property
#[derive(Debug, Clone)]
pub struct PropertyRule {
    pub value_type: ValueType,
    pub keywords: &'static [&'static str],
    pub functions: &'static [&'static str],
    pub multiplicity: Multiplicity,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub allow_negative: bool,
    pub allow_percentage: bool,
    /// Unitless numbers are accepted where a length is expected
    pub allow_unitless: bool,
    /// Author-defined identifiers (animation names, property names) are accepted
    pub allow_custom_ident: bool,
}

impl PropertyRule {
    fn new(value_type: ValueType) -> Self {
        Self {
            value_type,
            keywords: &[],
            functions: &[],
            multiplicity: Multiplicity::Single,
            min: None,
            max: None,
            allow_negative: false,
            allow_percentage: true,
            allow_unitless: false,
            allow_custom_ident: false,
        }
    }

    fn keywords(mut self, keywords: &'static [&'static str]) -> Self {
        self.keywords = keywords;
        self
    }

    fn functions(mut self, functions: &'static [&'static str]) -> Self {
        self.functions = functions;
        self
    }

    fn space_list(mut self, max: usize) -> Self {
        self.multiplicity = Multiplicity::SpaceList { max };
        self
    }

    fn comma_list(mut self) -> Self {
        self.multiplicity = Multiplicity::CommaList;
        self
    }

    fn range(mut self, min: f64, max: f64) -> Self {
        self.min = Some(min);
        self.max = Some(max);
        self
    }

    fn min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    fn negative(mut self) -> Self {
        self.allow_negative = true;
        self
    }

    fn no_percentage(mut self) -> Self {
        self.allow_percentage = false;
        self
    }

    fn unitless(mut self) -> Self {
        self.allow_unitless = true;
        self
    }

    fn custom_ident(mut self) -> Self {
        self.allow_custom_ident = true;
        self
    }

    /// Standalone length rule for function arguments and shorthand parts
    pub fn argument_length(allow_negative: bool, allow_percentage: bool) -> Self {
        let mut rule = Self::new(ValueType::Length);
        rule.allow_negative = allow_negative;
        rule.allow_percentage = allow_percentage;
        rule
    }

    /// Copy of this rule validating a single list element
    pub fn single(&self) -> Self {
        let mut rule = self.clone();
        rule.multiplicity = Multiplicity::Single;
        rule
    }

    pub fn has_keyword(&self, value: &str) -> bool {
        self.keywords.iter().any(|k| k.eq_ignore_ascii_case(value))
    }
}

/// CSS-wide keywords valid for every property
pub const CSS_WIDE_KEYWORDS: &[&str] = &["inherit", "initial", "unset", "revert", "revert-layer"];

pub const BORDER_STYLES: &[&str] = &[
    "none", "hidden", "dotted", "dashed", "solid", "double", "groove", "ridge", "inset", "outset",
];

pub const BORDER_WIDTH_KEYWORDS: &[&str] = &["thin", "medium", "thick"];

pub const TIMING_KEYWORDS: &[&str] = &[
    "ease", "linear", "ease-in", "ease-out", "ease-in-out", "step-start", "step-end",
];

pub const TIMING_FUNCTIONS: &[&str] = &["cubic-bezier", "steps", "linear"];

pub const TRANSFORM_FUNCTIONS: &[&str] = &[
    "matrix", "matrix3d", "translate", "translate3d", "translatex", "translatey", "translatez",
    "scale", "scale3d", "scalex", "scaley", "scalez", "rotate", "rotate3d", "rotatex", "rotatey",
    "rotatez", "skew", "skewx", "skewy", "perspective",
];

pub const GRADIENT_FUNCTIONS: &[&str] = &[
    "linear-gradient",
    "radial-gradient",
    "conic-gradient",
    "repeating-linear-gradient",
    "repeating-radial-gradient",
    "repeating-conic-gradient",
];

pub const SHAPE_FUNCTIONS: &[&str] = &["inset", "circle", "ellipse", "polygon", "url"];

pub const GRID_FUNCTIONS: &[&str] = &["repeat", "minmax", "fit-content"];

pub const ANIMATION_DIRECTIONS: &[&str] = &["normal", "reverse", "alternate", "alternate-reverse"];
pub const ANIMATION_FILL_MODES: &[&str] = &["none", "forwards", "backwards", "both"];
pub const ANIMATION_PLAY_STATES: &[&str] = &["running", "paused"];

const SIZE_KEYWORDS: &[&str] = &["auto", "min-content", "max-content", "fit-content"];
const MAX_SIZE_KEYWORDS: &[&str] = &["none", "min-content", "max-content", "fit-content"];
const AUTO: &[&str] = &["auto"];
const NONE: &[&str] = &["none"];
const NORMAL: &[&str] = &["normal"];
const POSITION_KEYWORDS: &[&str] = &["left", "right", "top", "bottom", "center"];

pub const FONT_SIZE_KEYWORDS: &[&str] = &[
    "xx-small", "x-small", "small", "medium", "large", "x-large", "xx-large", "xxx-large",
    "smaller", "larger", "math",
];

const FONT_WEIGHT_KEYWORDS: &[&str] = &["normal", "bold", "bolder", "lighter"];

const DISPLAY: &[&str] = &[
    "block", "inline", "inline-block", "flex", "inline-flex", "grid", "inline-grid", "contents",
    "none", "table", "table-row", "table-cell", "list-item", "flow-root",
];
const POSITION: &[&str] = &["static", "relative", "absolute", "fixed", "sticky"];
const OVERFLOW: &[&str] = &["visible", "hidden", "clip", "scroll", "auto"];
const VISIBILITY: &[&str] = &["visible", "hidden", "collapse"];
const TEXT_ALIGN: &[&str] = &["left", "right", "center", "justify", "start", "end"];
const TEXT_TRANSFORM: &[&str] = &["none", "capitalize", "uppercase", "lowercase", "full-width"];
const FONT_STYLE: &[&str] = &["normal", "italic", "oblique"];
const WHITE_SPACE: &[&str] = &["normal", "nowrap", "pre", "pre-wrap", "pre-line", "break-spaces"];
const WORD_BREAK: &[&str] = &["normal", "break-all", "keep-all", "break-word"];
const OVERFLOW_WRAP: &[&str] = &["normal", "break-word", "anywhere"];
const ALIGN: &[&str] = &[
    "normal", "stretch", "center", "start", "end", "flex-start", "flex-end", "baseline",
    "space-between", "space-around", "space-evenly", "auto", "self-start", "self-end",
];
const FLEX_DIRECTION: &[&str] = &["row", "row-reverse", "column", "column-reverse"];
const FLEX_WRAP: &[&str] = &["nowrap", "wrap", "wrap-reverse"];
const BOX_SIZING: &[&str] = &["content-box", "border-box"];
const FLOAT: &[&str] = &["left", "right", "none", "inline-start", "inline-end"];
const CLEAR: &[&str] = &["left", "right", "both", "none", "inline-start", "inline-end"];
const OBJECT_FIT: &[&str] = &["fill", "contain", "cover", "none", "scale-down"];
const POINTER_EVENTS: &[&str] = &["auto", "none"];
const USER_SELECT: &[&str] = &["auto", "none", "text", "all", "contain"];
const RESIZE: &[&str] = &["none", "both", "horizontal", "vertical", "block", "inline"];
const CURSOR: &[&str] = &[
    "auto", "default", "none", "pointer", "wait", "text", "move", "help", "not-allowed",
    "progress", "crosshair", "grab", "grabbing", "zoom-in", "zoom-out", "col-resize",
    "row-resize", "context-menu", "cell", "copy", "alias", "no-drop", "all-scroll",
];
const VERTICAL_ALIGN: &[&str] = &[
    "baseline", "sub", "super", "text-top", "text-bottom", "middle", "top", "bottom",
];
const BACKGROUND_REPEAT: &[&str] = &["repeat", "repeat-x", "repeat-y", "no-repeat", "space", "round"];
const BACKGROUND_ATTACHMENT: &[&str] = &["scroll", "fixed", "local"];
const BOX_KEYWORDS: &[&str] = &["border-box", "padding-box", "content-box", "text"];
const BACKGROUND_SIZE: &[&str] = &["auto", "cover", "contain"];
const TEXT_DECORATION_LINE: &[&str] = &["none", "underline", "overline", "line-through"];
const TEXT_DECORATION_STYLE: &[&str] = &["solid", "double", "dotted", "dashed", "wavy"];
const TEXT_OVERFLOW: &[&str] = &["clip", "ellipsis"];
const LIST_STYLE_POSITION: &[&str] = &["inside", "outside"];
const LIST_STYLE_TYPE: &[&str] = &[
    "none", "disc", "circle", "square", "decimal", "decimal-leading-zero", "lower-roman",
    "upper-roman", "lower-alpha", "upper-alpha", "lower-latin", "upper-latin",
];
const BLEND_MODES: &[&str] = &[
    "normal", "multiply", "screen", "overlay", "darken", "lighten", "color-dodge", "color-burn",
    "hard-light", "soft-light", "difference", "exclusion", "hue", "saturation", "color",
    "luminosity",
];
const ISOLATION: &[&str] = &["auto", "isolate"];
const SCROLL_BEHAVIOR: &[&str] = &["auto", "smooth"];
const APPEARANCE: &[&str] = &["none", "auto"];
const TABLE_LAYOUT: &[&str] = &["auto", "fixed"];
const BORDER_COLLAPSE: &[&str] = &["collapse", "separate"];
const TOUCH_ACTION: &[&str] = &["auto", "none", "pan-x", "pan-y", "manipulation", "pinch-zoom"];
const COLOR_KEYWORDS_AUTO: &[&str] = &["auto"];
const CONTENT_KEYWORDS: &[&str] = &[
    "none", "normal", "open-quote", "close-quote", "no-open-quote", "no-close-quote",
];
const GRID_TEMPLATE_KEYWORDS: &[&str] = &[
    "none", "subgrid", "masonry", "auto", "min-content", "max-content",
];
const GRID_LINE_KEYWORDS: &[&str] = &["auto", "span"];
const TRANSITION_PROPERTY_KEYWORDS: &[&str] = &["all", "none"];
const ITERATION_KEYWORDS: &[&str] = &["infinite"];
const SHADOW_KEYWORDS: &[&str] = &["none"];
const ASPECT_KEYWORDS: &[&str] = &["auto"];
const WILL_CHANGE: &[&str] = &["auto", "scroll-position", "contents"];

/// Registry of every known property
#[derive(Debug)]
pub struct PropertyRegistry {
    rules: HashMap<&'static str, PropertyRule>,
}

impl PropertyRegistry {
    fn build() -> Self {
        use ValueType::*;

        let mut rules: HashMap<&'static str, PropertyRule> = HashMap::new();
        let mut add = |names: &[&'static str], rule: PropertyRule| {
            for name in names {
                rules.insert(*name, rule.clone());
            }
        };

        // Box model
        add(&["padding"], PropertyRule::new(Length).space_list(4));
        add(
            &["padding-top", "padding-right", "padding-bottom", "padding-left"],
            PropertyRule::new(Length),
        );
        add(&["padding-inline", "padding-block"], PropertyRule::new(Length).space_list(2));
        add(&["margin"], PropertyRule::new(Length).keywords(AUTO).negative().space_list(4));
        add(
            &["margin-top", "margin-right", "margin-bottom", "margin-left"],
            PropertyRule::new(Length).keywords(AUTO).negative(),
        );
        add(
            &["margin-inline", "margin-block"],
            PropertyRule::new(Length).keywords(AUTO).negative().space_list(2),
        );
        add(
            &["width", "height", "min-width", "min-height", "inline-size", "block-size"],
            PropertyRule::new(Length).keywords(SIZE_KEYWORDS),
        );
        add(&["max-width", "max-height"], PropertyRule::new(Length).keywords(MAX_SIZE_KEYWORDS));
        add(
            &["top", "right", "bottom", "left"],
            PropertyRule::new(Length).keywords(AUTO).negative(),
        );
        add(&["inset"], PropertyRule::new(Length).keywords(AUTO).negative().space_list(4));
        add(&["gap"], PropertyRule::new(Length).keywords(NORMAL).space_list(2));
        add(&["row-gap", "column-gap"], PropertyRule::new(Length).keywords(NORMAL));
        add(&["scroll-margin"], PropertyRule::new(Length).negative().space_list(4));
        add(&["scroll-padding"], PropertyRule::new(Length).keywords(AUTO).space_list(4));
        add(&["box-sizing"], PropertyRule::new(Keyword).keywords(BOX_SIZING));

        // Borders and outlines
        add(
            &["border", "border-top", "border-right", "border-bottom", "border-left", "outline", "column-rule"],
            PropertyRule::new(SpecialShorthand),
        );
        add(
            &["border-width"],
            PropertyRule::new(Length).keywords(BORDER_WIDTH_KEYWORDS).no_percentage().space_list(4),
        );
        add(
            &[
                "border-top-width", "border-right-width", "border-bottom-width",
                "border-left-width", "outline-width",
            ],
            PropertyRule::new(Length).keywords(BORDER_WIDTH_KEYWORDS).no_percentage(),
        );
        add(&["border-style"], PropertyRule::new(Keyword).keywords(BORDER_STYLES).space_list(4));
        add(&["outline-style"], PropertyRule::new(Keyword).keywords(&[
            "auto", "none", "dotted", "dashed", "solid", "double", "groove", "ridge", "inset", "outset",
        ]));
        add(&["border-color"], PropertyRule::new(Color).space_list(4));
        add(
            &[
                "border-top-color", "border-right-color", "border-bottom-color",
                "border-left-color", "outline-color", "column-rule-color",
                "text-decoration-color", "background-color", "color",
            ],
            PropertyRule::new(Color),
        );
        add(&["outline-offset"], PropertyRule::new(Length).negative().no_percentage());
        add(&["border-radius"], PropertyRule::new(BorderRadius));
        add(
            &[
                "border-top-left-radius", "border-top-right-radius",
                "border-bottom-right-radius", "border-bottom-left-radius",
            ],
            PropertyRule::new(Length).space_list(2),
        );
        add(&["border-collapse"], PropertyRule::new(Keyword).keywords(BORDER_COLLAPSE));
        add(&["border-spacing"], PropertyRule::new(Length).no_percentage().space_list(2));

        // Colors and painting
        add(&["caret-color", "accent-color"], PropertyRule::new(Color).keywords(COLOR_KEYWORDS_AUTO));
        add(&["fill", "stroke"], PropertyRule::new(Color).keywords(NONE));
        add(&["opacity", "fill-opacity", "stroke-opacity"], PropertyRule::new(Number).range(0.0, 1.0));
        add(&["stroke-width"], PropertyRule::new(Length).unitless());
        add(&["mix-blend-mode", "background-blend-mode"], PropertyRule::new(Keyword).keywords(BLEND_MODES));
        add(&["isolation"], PropertyRule::new(Keyword).keywords(ISOLATION));

        // Backgrounds and images
        add(&["background"], PropertyRule::new(Background));
        add(
            &["background-image", "mask-image", "border-image-source", "list-style-image"],
            PropertyRule::new(Image).keywords(NONE).functions(GRADIENT_FUNCTIONS).comma_list(),
        );
        add(
            &["background-repeat"],
            PropertyRule::new(Keyword).keywords(BACKGROUND_REPEAT).space_list(2),
        );
        add(&["background-attachment"], PropertyRule::new(Keyword).keywords(BACKGROUND_ATTACHMENT));
        add(&["background-clip", "background-origin"], PropertyRule::new(Keyword).keywords(BOX_KEYWORDS));
        add(
            &["background-size"],
            PropertyRule::new(Length).keywords(BACKGROUND_SIZE).space_list(2),
        );
        add(
            &["background-position", "object-position", "transform-origin", "perspective-origin"],
            PropertyRule::new(Complex).keywords(POSITION_KEYWORDS),
        );
        add(&["object-fit"], PropertyRule::new(Keyword).keywords(OBJECT_FIT));

        // Typography
        add(&["font"], PropertyRule::new(Font));
        add(&["font-family"], PropertyRule::new(FontFamily));
        add(&["font-size"], PropertyRule::new(Length).keywords(FONT_SIZE_KEYWORDS));
        add(&["font-weight"], PropertyRule::new(Number).keywords(FONT_WEIGHT_KEYWORDS).range(1.0, 1000.0).no_percentage());
        add(&["font-style"], PropertyRule::new(Keyword).keywords(FONT_STYLE));
        add(&["line-height"], PropertyRule::new(Length).keywords(NORMAL).unitless());
        add(
            &["letter-spacing", "word-spacing"],
            PropertyRule::new(Length).keywords(NORMAL).negative(),
        );
        add(&["text-indent"], PropertyRule::new(Length).negative());
        add(&["text-align"], PropertyRule::new(Keyword).keywords(TEXT_ALIGN));
        add(&["text-transform"], PropertyRule::new(Keyword).keywords(TEXT_TRANSFORM));
        add(&["text-decoration-line"], PropertyRule::new(Keyword).keywords(TEXT_DECORATION_LINE).space_list(3));
        add(&["text-decoration-style"], PropertyRule::new(Keyword).keywords(TEXT_DECORATION_STYLE));
        add(
            &["text-decoration-thickness", "text-underline-offset"],
            PropertyRule::new(Length).keywords(&["auto", "from-font"]),
        );
        add(&["text-overflow"], PropertyRule::new(Keyword).keywords(TEXT_OVERFLOW));
        add(&["text-shadow", "box-shadow"], PropertyRule::new(Shadow).keywords(SHADOW_KEYWORDS));
        add(&["white-space"], PropertyRule::new(Keyword).keywords(WHITE_SPACE));
        add(&["word-break"], PropertyRule::new(Keyword).keywords(WORD_BREAK));
        add(&["overflow-wrap"], PropertyRule::new(Keyword).keywords(OVERFLOW_WRAP));
        add(&["vertical-align"], PropertyRule::new(Length).keywords(VERTICAL_ALIGN).negative());
        add(&["list-style-type"], PropertyRule::new(Keyword).keywords(LIST_STYLE_TYPE));
        add(&["list-style-position"], PropertyRule::new(Keyword).keywords(LIST_STYLE_POSITION));
        add(&["content"], PropertyRule::new(Content).keywords(CONTENT_KEYWORDS));
        add(&["quotes"], PropertyRule::new(String).keywords(&["none", "auto"]).space_list(4));

        // Layout
        add(&["display"], PropertyRule::new(Keyword).keywords(DISPLAY));
        add(&["position"], PropertyRule::new(Keyword).keywords(POSITION));
        add(&["overflow"], PropertyRule::new(Keyword).keywords(OVERFLOW).space_list(2));
        add(&["overflow-x", "overflow-y"], PropertyRule::new(Keyword).keywords(OVERFLOW));
        add(&["visibility"], PropertyRule::new(Keyword).keywords(VISIBILITY));
        add(&["z-index"], PropertyRule::new(Integer).keywords(AUTO).negative());
        add(&["order"], PropertyRule::new(Integer).negative());
        add(&["columns"], PropertyRule::new(Integer).keywords(AUTO).min(1.0));
        add(&["float"], PropertyRule::new(Keyword).keywords(FLOAT));
        add(&["clear"], PropertyRule::new(Keyword).keywords(CLEAR));
        add(
            &[
                "align-items", "align-content", "align-self", "justify-content", "justify-items",
                "justify-self", "place-items", "place-content", "place-self",
            ],
            PropertyRule::new(Keyword).keywords(ALIGN),
        );
        add(&["flex-direction"], PropertyRule::new(Keyword).keywords(FLEX_DIRECTION));
        add(&["flex-wrap"], PropertyRule::new(Keyword).keywords(FLEX_WRAP));
        add(&["flex-grow", "flex-shrink"], PropertyRule::new(Number).min(0.0).no_percentage());
        add(&["flex-basis"], PropertyRule::new(Length).keywords(&[
            "auto", "content", "min-content", "max-content", "fit-content",
        ]));
        add(
            &["flex"],
            PropertyRule::new(Complex).keywords(&["auto", "none", "content"]),
        );
        add(
            &["grid-template-columns", "grid-template-rows", "grid-auto-columns", "grid-auto-rows"],
            PropertyRule::new(Complex).keywords(GRID_TEMPLATE_KEYWORDS).functions(GRID_FUNCTIONS),
        );
        add(
            &["grid-column", "grid-row", "grid-area"],
            PropertyRule::new(Complex).keywords(GRID_LINE_KEYWORDS),
        );
        add(&["aspect-ratio"], PropertyRule::new(AspectRatio).keywords(ASPECT_KEYWORDS));
        add(&["table-layout"], PropertyRule::new(Keyword).keywords(TABLE_LAYOUT));

        // Transforms and effects
        add(
            &["transform"],
            PropertyRule::new(Function).keywords(NONE).functions(TRANSFORM_FUNCTIONS).space_list(16),
        );
        add(&["rotate"], PropertyRule::new(Angle).keywords(NONE));
        add(&["scale"], PropertyRule::new(Number).keywords(NONE).space_list(3));
        add(&["translate"], PropertyRule::new(Length).keywords(NONE).negative().space_list(3));
        add(&["perspective"], PropertyRule::new(Length).keywords(NONE).no_percentage());
        add(&["filter", "backdrop-filter"], PropertyRule::new(Filter).keywords(NONE));
        add(
            &["clip-path"],
            PropertyRule::new(KeywordOrFunction).keywords(NONE).functions(SHAPE_FUNCTIONS),
        );

        // Transitions and animations
        add(&["transition"], PropertyRule::new(Transition).keywords(NONE));
        add(
            &["transition-property"],
            PropertyRule::new(Keyword).keywords(TRANSITION_PROPERTY_KEYWORDS).custom_ident().comma_list(),
        );
        add(
            &["transition-duration", "animation-duration"],
            PropertyRule::new(Time).comma_list(),
        );
        add(
            &["transition-delay", "animation-delay"],
            PropertyRule::new(Time).negative().comma_list(),
        );
        add(
            &["transition-timing-function", "animation-timing-function"],
            PropertyRule::new(KeywordOrFunction)
                .keywords(TIMING_KEYWORDS)
                .functions(TIMING_FUNCTIONS)
                .comma_list(),
        );
        add(&["animation"], PropertyRule::new(Animation).keywords(NONE));
        add(
            &["animation-name"],
            PropertyRule::new(Keyword).keywords(NONE).custom_ident().comma_list(),
        );
        add(
            &["animation-iteration-count"],
            PropertyRule::new(Number).keywords(ITERATION_KEYWORDS).min(0.0).no_percentage().comma_list(),
        );
        add(&["animation-direction"], PropertyRule::new(Keyword).keywords(ANIMATION_DIRECTIONS).comma_list());
        add(&["animation-fill-mode"], PropertyRule::new(Keyword).keywords(ANIMATION_FILL_MODES).comma_list());
        add(&["animation-play-state"], PropertyRule::new(Keyword).keywords(ANIMATION_PLAY_STATES).comma_list());

        // Interaction
        add(&["cursor"], PropertyRule::new(Keyword).keywords(CURSOR));
        add(&["pointer-events"], PropertyRule::new(Keyword).keywords(POINTER_EVENTS));
        add(&["user-select"], PropertyRule::new(Keyword).keywords(USER_SELECT));
        add(&["resize"], PropertyRule::new(Keyword).keywords(RESIZE));
        add(&["scroll-behavior"], PropertyRule::new(Keyword).keywords(SCROLL_BEHAVIOR));
        add(&["appearance"], PropertyRule::new(Keyword).keywords(APPEARANCE));
        add(&["touch-action"], PropertyRule::new(Keyword).keywords(TOUCH_ACTION));
        add(
            &["will-change"],
            PropertyRule::new(Keyword).keywords(WILL_CHANGE).custom_ident().comma_list(),
        );

        Self { rules }
    }

    pub fn get(&self, property: &str) -> Option<&PropertyRule> {
        self.rules.get(property)
    }

    #[cfg(test)]
    fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Shared registry, built on first use
pub fn registry() -> &'static PropertyRegistry {
    static REGISTRY: OnceLock<PropertyRegistry> = OnceLock::new();
    REGISTRY.get_or_init(PropertyRegistry::build)
}

/// A short property name and the physical properties it stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Alias {
    /// Property whose rule validates the value
    pub property: &'static str,
    /// Properties written to the declaration block; empty means just `property`
    pub expands_to: &'static [&'static str],
}

const fn alias(property: &'static str) -> Alias {
    Alias { property, expands_to: &[] }
}

const fn expand(property: &'static str, expands_to: &'static [&'static str]) -> Alias {
    Alias { property, expands_to }
}

/// Resolve a short alias such as `p` or `bg`; full property names return `None`.
pub fn resolve_alias(name: &str) -> Option<Alias> {
    let resolved = match name {
        "p" => alias("padding"),
        "pt" => alias("padding-top"),
        "pr" => alias("padding-right"),
        "pb" => alias("padding-bottom"),
        "pl" => alias("padding-left"),
        "px" => expand("padding-left", &["padding-left", "padding-right"]),
        "py" => expand("padding-top", &["padding-top", "padding-bottom"]),
        "m" => alias("margin"),
        "mt" => alias("margin-top"),
        "mr" => alias("margin-right"),
        "mb" => alias("margin-bottom"),
        "ml" => alias("margin-left"),
        "mx" => expand("margin-left", &["margin-left", "margin-right"]),
        "my" => expand("margin-top", &["margin-top", "margin-bottom"]),
        "w" => alias("width"),
        "h" => alias("height"),
        "min-w" => alias("min-width"),
        "min-h" => alias("min-height"),
        "max-w" => alias("max-width"),
        "max-h" => alias("max-height"),
        "size" => expand("width", &["width", "height"]),
        "inset-x" => expand("left", &["left", "right"]),
        "inset-y" => expand("top", &["top", "bottom"]),
        "gap-x" => alias("column-gap"),
        "gap-y" => alias("row-gap"),
        "bg" => alias("background"),
        "bg-color" => alias("background-color"),
        "bg-image" => alias("background-image"),
        "text" => alias("color"),
        "text-size" => alias("font-size"),
        "family" => alias("font-family"),
        "weight" => alias("font-weight"),
        "leading" => alias("line-height"),
        "tracking" => alias("letter-spacing"),
        "indent" => alias("text-indent"),
        "align" => alias("vertical-align"),
        "rounded" => alias("border-radius"),
        "shadow" => alias("box-shadow"),
        "z" => alias("z-index"),
        "basis" => alias("flex-basis"),
        "grow" => alias("flex-grow"),
        "shrink" => alias("flex-shrink"),
        "grid-cols" => alias("grid-template-columns"),
        "grid-rows" => alias("grid-template-rows"),
        "col" => alias("grid-column"),
        "row" => alias("grid-row"),
        "aspect" => alias("aspect-ratio"),
        "backdrop" => alias("backdrop-filter"),
        "duration" => alias("transition-duration"),
        "delay" => alias("transition-delay"),
        "ease" => alias("transition-timing-function"),
        "animate" => alias("animation"),
        "d" => alias("display"),
        _ => return None,
    };
    Some(resolved)
}
