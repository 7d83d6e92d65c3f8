//! Static allow-lists for the SVG sanitizer profile.
//!
//! Names are lowercase because the rewriter reports tag and attribute names lowercased.

pub const SVG_ALLOWED_TAGS: &[&str] = &[
    "svg",
    "a",
    "altglyph",
    "altglyphdef",
    "altglyphitem",
    "circle",
    "clippath",
    "defs",
    "desc",
    "ellipse",
    "filter",
    "font",
    "g",
    "glyph",
    "glyphref",
    "hkern",
    "image",
    "line",
    "lineargradient",
    "marker",
    "mask",
    "metadata",
    "mpath",
    "path",
    "pattern",
    "polygon",
    "polyline",
    "radialgradient",
    "rect",
    "stop",
    "switch",
    "symbol",
    "text",
    "textpath",
    "title",
    "tref",
    "tspan",
    "use",
    "view",
    "vkern",
    // filter primitives
    "feblend",
    "fecolormatrix",
    "fecomponenttransfer",
    "fecomposite",
    "feconvolvematrix",
    "fediffuselighting",
    "fedisplacementmap",
    "fedistantlight",
    "fedropshadow",
    "feflood",
    "fefunca",
    "fefuncb",
    "fefuncg",
    "fefuncr",
    "fegaussianblur",
    "feimage",
    "femerge",
    "femergenode",
    "femorphology",
    "feoffset",
    "fepointlight",
    "fespecularlighting",
    "fespotlight",
    "fetile",
    "feturbulence",
];

/// Elements removed together with everything inside them.
pub const FORBID_CONTENTS: &[&str] = &[
    "script",
    "style",
    "iframe",
    "foreignobject",
    "object",
    "embed",
    "noscript",
    "template",
    "textarea",
    "xmp",
    "noembed",
    "noframes",
    "plaintext",
    "animate",
    "animatecolor",
    "animatemotion",
    "animatetransform",
    "set",
    "handler",
    "listener",
];

pub const SVG_ALLOWED_ATTR: &[&str] = &[
    "accent-height",
    "accumulate",
    "additive",
    "alignment-baseline",
    "ascent",
    "azimuth",
    "basefrequency",
    "baseline-shift",
    "bias",
    "class",
    "clip",
    "clippathunits",
    "clip-path",
    "clip-rule",
    "color",
    "color-interpolation",
    "color-interpolation-filters",
    "color-profile",
    "color-rendering",
    "cx",
    "cy",
    "d",
    "dx",
    "dy",
    "diffuseconstant",
    "direction",
    "display",
    "divisor",
    "dominant-baseline",
    "edgemode",
    "elevation",
    "fill",
    "fill-opacity",
    "fill-rule",
    "filter",
    "filterunits",
    "flood-color",
    "flood-opacity",
    "font-family",
    "font-size",
    "font-size-adjust",
    "font-stretch",
    "font-style",
    "font-variant",
    "font-weight",
    "fx",
    "fy",
    "g1",
    "g2",
    "glyph-name",
    "glyphref",
    "gradientunits",
    "gradienttransform",
    "height",
    "href",
    "id",
    "image-rendering",
    "in",
    "in2",
    "k",
    "k1",
    "k2",
    "k3",
    "k4",
    "kerning",
    "kernelmatrix",
    "kernelunitlength",
    "lang",
    "lengthadjust",
    "letter-spacing",
    "lighting-color",
    "local",
    "marker-end",
    "marker-mid",
    "marker-start",
    "markerheight",
    "markerunits",
    "markerwidth",
    "mask",
    "maskcontentunits",
    "maskunits",
    "media",
    "mode",
    "name",
    "numoctaves",
    "offset",
    "opacity",
    "operator",
    "order",
    "orient",
    "orientation",
    "origin",
    "overflow",
    "paint-order",
    "path",
    "pathlength",
    "patterncontentunits",
    "patterntransform",
    "patternunits",
    "points",
    "preservealpha",
    "preserveaspectratio",
    "primitiveunits",
    "r",
    "radius",
    "refx",
    "refy",
    "result",
    "role",
    "rotate",
    "rx",
    "ry",
    "scale",
    "seed",
    "shape-rendering",
    "specularconstant",
    "specularexponent",
    "spreadmethod",
    "startoffset",
    "stddeviation",
    "stitchtiles",
    "stop-color",
    "stop-opacity",
    "stroke",
    "stroke-dasharray",
    "stroke-dashoffset",
    "stroke-linecap",
    "stroke-linejoin",
    "stroke-miterlimit",
    "stroke-opacity",
    "stroke-width",
    "style",
    "surfacescale",
    "systemlanguage",
    "tabindex",
    "targetx",
    "targety",
    "text-anchor",
    "text-decoration",
    "text-rendering",
    "textlength",
    "transform",
    "transform-origin",
    "type",
    "u1",
    "u2",
    "unicode",
    "unicode-bidi",
    "vector-effect",
    "version",
    "vert-adv-y",
    "vert-origin-x",
    "vert-origin-y",
    "viewbox",
    "visibility",
    "width",
    "word-spacing",
    "writing-mode",
    "x",
    "x1",
    "x2",
    "xchannelselector",
    "xmlns",
    "y",
    "y1",
    "y2",
    "ychannelselector",
    "z",
    "zoomandpan",
    // namespaced
    "xlink:href",
    "xlink:title",
    "xml:id",
    "xml:lang",
    "xml:space",
    "xmlns:xlink",
];

/// Attributes that point at another resource and are restricted to in-document fragments.
pub const REFERENCE_ATTR: &[&str] = &["href", "xlink:href"];

/// Elements that may carry an inline `data:image/...` reference.
pub const DATA_URI_TAGS: &[&str] = &["image", "feimage"];
