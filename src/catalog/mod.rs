//! Small Basic built-in object catalog and keyword tables.
//!
//! All tables are process-wide constants built once at first use. Lookups are
//! case-insensitive; callers pass canonical (lowercased) names. Member lists
//! keep their declaration order so that edit-distance suggestions resolve
//! ties deterministically.

use once_cell::sync::Lazy;
use std::collections::{HashMap, HashSet};

/// Built-in object names, lowercased.
pub static BUILTIN_OBJECTS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    HashSet::from([
        "textwindow",
        "graphicswindow",
        "math",
        "clock",
        "file",
        "network",
        "program",
        "shapes",
        "stack",
        "turtle",
        "timer",
        "imagelist",
        "flickr",
        "sound",
        "mouse",
        "text",
        "controls",
        "dictionary",
        "desktop",
        "array",
    ])
});

/// Reserved words, excluded from variable tracking and capitalization checks.
pub static RESERVED_KEYWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    HashSet::from([
        "if", "then", "else", "elseif", "endif", "for", "to", "step", "next", "while", "endwhile",
        "sub", "endsub", "goto", "label", "true", "false", "and", "or", "not",
    ])
});

/// Built-in method names that look like bare subroutine calls (`Clear()`)
/// but belong to catalog objects; excluded from subroutine call tracking.
pub static KNOWN_METHOD_NAMES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    HashSet::from([
        "clear",
        "read",
        "readline",
        "write",
        "writeline",
        "readnumber",
        "readkey",
        "show",
        "hide",
        "getpictureofmoment",
        "getrandompicture",
        "popvalue",
        "pushvalue",
        "getitemcount",
        "playmusic",
        "playmusicandwait",
        "playchime",
        "playchimes",
        "playchimesandwait",
        "play",
        "playandwait",
        "getwebpagecontents",
        "downloadfile",
        "playtocompletion",
        "playbellring",
    ])
});

/// Object name -> every valid member (properties, events and methods).
pub static OBJECT_MEMBERS: Lazy<HashMap<&'static str, Vec<&'static str>>> = Lazy::new(|| {
    HashMap::from([
        (
            "textwindow",
            vec![
                "backgroundcolor",
                "foregroundcolor",
                "cursorleft",
                "cursortop",
                "title",
                "left",
                "top",
                "writeline",
                "write",
                "read",
                "readnumber",
                "readkey",
                "clear",
                "pause",
                "pauseifvisible",
                "pausewithmessage",
                "pausewithoutmessage",
                "hide",
                "show",
            ],
        ),
        (
            "graphicswindow",
            vec![
                "backgroundcolor",
                "brushcolor",
                "canresize",
                "fontbold",
                "fontitalic",
                "fontname",
                "fontsize",
                "height",
                "lastkey",
                "left",
                "mousex",
                "mousey",
                "pencolor",
                "penwidth",
                "title",
                "top",
                "width",
                "clear",
                "drawboundtext",
                "drawellipse",
                "drawimage",
                "drawline",
                "drawrectangle",
                "drawresizedimage",
                "drawtext",
                "drawtriangle",
                "fillellipse",
                "fillrectangle",
                "filltriangle",
                "getcolorfromrgb",
                "getpixel",
                "getrandomcolor",
                "hide",
                "keydown",
                "keyup",
                "mousedown",
                "mousemove",
                "mouseup",
                "setpixel",
                "show",
                "showmessage",
            ],
        ),
        (
            "math",
            vec![
                "abs",
                "acos",
                "asin",
                "atan",
                "ceiling",
                "cos",
                "floor",
                "getdegrees",
                "getradians",
                "log",
                "max",
                "min",
                "power",
                "round",
                "sin",
                "squareroot",
                "tan",
                "getrandomnumber",
                "remainder",
                "pi",
            ],
        ),
        (
            "file",
            vec![
                "readcontents",
                "writecontents",
                "appendcontents",
                "gettemporaryfilepath",
                "getsettingsfilepath",
                "copyfile",
                "deletefile",
                "insertline",
                "readline",
                "writeline",
                "createdirectory",
                "deletedirectory",
                "getdirectories",
                "getfiles",
            ],
        ),
        (
            "turtle",
            vec![
                "x",
                "y",
                "angle",
                "speed",
                "brushcolor",
                "isvisible",
                "pencolor",
                "pendown",
                "penwidth",
                "xcenter",
                "ycenter",
                "move",
                "turn",
                "turnleft",
                "turnright",
                "penup",
                "show",
                "hide",
                "showturtle",
                "hideturtle",
                "getcolor",
                "setcolor",
                "moveto",
                "turntowards",
            ],
        ),
        (
            "clock",
            vec![
                "hour", "minute", "second", "date", "day", "month", "year", "weekday", "time",
            ],
        ),
        (
            "sound",
            vec![
                "play",
                "playandwait",
                "playchime",
                "playchimes",
                "playchimesandwait",
                "playmusic",
                "playmusicandwait",
                "stop",
                "playtocompletion",
                "playbellring",
            ],
        ),
        (
            "program",
            vec![
                "delay",
                "end",
                "pause",
                "directory",
                "arguments",
                "setarguments",
                "restart",
                "version",
            ],
        ),
        (
            "timer",
            vec!["interval", "isenabled", "tick", "pause", "resume"],
        ),
        ("stack", vec!["pushvalue", "popvalue", "getcount"]),
        (
            "text",
            vec![
                "getlength",
                "getsubtext",
                "converttouppercase",
                "converttolowercase",
                "issubtext",
                "append",
                "getcharacter",
                "getcharactercode",
                "getindexof",
                "startswith",
                "endswith",
                "getsubtexttoend",
            ],
        ),
        (
            "imagelist",
            vec!["loadimage", "getwidthofimage", "getheightofimage"],
        ),
        (
            "shapes",
            vec![
                "addrectangle",
                "addellipse",
                "addtriangle",
                "addline",
                "addimage",
                "addtext",
                "settext",
                "remove",
                "move",
                "rotate",
                "zoom",
                "animate",
                "getleft",
                "gettop",
                "getopacity",
                "setopacity",
                "hideshape",
                "showshape",
                "lastfoundshape",
                "rotateangle",
            ],
        ),
        ("network", vec!["downloadfile", "getwebpagecontents"]),
        (
            "mouse",
            vec![
                "mousex",
                "mousey",
                "isleftbuttondown",
                "ismiddlebuttondown",
                "isrightbuttondown",
                "buttondown",
            ],
        ),
        (
            "flickr",
            vec![
                "getpictureofmoment",
                "getrandompicture",
                "getpictureofmomentfortag",
                "getpicturelist",
            ],
        ),
        (
            "controls",
            vec![
                "addbutton",
                "addtextbox",
                "buttonclicked",
                "getbuttoncaption",
                "gettextboxtext",
                "hidecontrol",
                "remove",
                "setbuttoncaption",
                "settextboxtext",
                "showcontrol",
                "texttyped",
                "lastclickedbutton",
                "lasttypedtextbox",
            ],
        ),
        (
            "dictionary",
            vec![
                "addvalue",
                "containskey",
                "containsvalue",
                "getkeys",
                "getvalue",
                "getvalues",
                "removekey",
            ],
        ),
        ("desktop", vec!["height", "width"]),
        (
            "array",
            vec![
                "containsindex",
                "containsvalue",
                "getallindices",
                "getitemcount",
                "getvalue",
                "isarray",
                "removevalue",
                "setvalue",
            ],
        ),
    ])
});

/// Object name -> members that are methods and require call parentheses.
/// Always a subset of [`OBJECT_MEMBERS`] for the same object.
pub static OBJECT_METHODS: Lazy<HashMap<&'static str, HashSet<&'static str>>> = Lazy::new(|| {
    HashMap::from([
        (
            "textwindow",
            HashSet::from([
                "writeline",
                "write",
                "read",
                "readnumber",
                "readkey",
                "clear",
                "pause",
                "pauseifvisible",
                "pausewithmessage",
                "pausewithoutmessage",
                "hide",
                "show",
            ]),
        ),
        (
            "graphicswindow",
            HashSet::from([
                "show",
                "hide",
                "clear",
                "drawboundtext",
                "drawellipse",
                "drawimage",
                "drawline",
                "drawrectangle",
                "drawresizedimage",
                "drawtext",
                "drawtriangle",
                "fillellipse",
                "fillrectangle",
                "filltriangle",
                "getcolorfromrgb",
                "getpixel",
                "getrandomcolor",
                "keydown",
                "keyup",
                "mousedown",
                "mousemove",
                "mouseup",
                "setpixel",
                "showmessage",
            ]),
        ),
        (
            "math",
            HashSet::from([
                "abs",
                "acos",
                "asin",
                "atan",
                "ceiling",
                "cos",
                "floor",
                "getdegrees",
                "getradians",
                "log",
                "max",
                "min",
                "power",
                "round",
                "sin",
                "squareroot",
                "tan",
                "getrandomnumber",
                "remainder",
            ]),
        ),
        (
            "file",
            HashSet::from([
                "readcontents",
                "writecontents",
                "appendcontents",
                "gettemporaryfilepath",
                "getsettingsfilepath",
                "copyfile",
                "deletefile",
                "insertline",
                "readline",
                "writeline",
                "createdirectory",
                "deletedirectory",
                "getdirectories",
                "getfiles",
            ]),
        ),
        (
            "program",
            HashSet::from(["delay", "end", "pause", "restart", "setarguments"]),
        ),
        (
            "sound",
            HashSet::from([
                "play",
                "playandwait",
                "playchime",
                "playchimes",
                "playchimesandwait",
                "playmusic",
                "playmusicandwait",
                "stop",
            ]),
        ),
        (
            "network",
            HashSet::from(["downloadfile", "getwebpagecontents"]),
        ),
        (
            "turtle",
            HashSet::from([
                "move",
                "turn",
                "turnleft",
                "turnright",
                "penup",
                "pendown",
                "show",
                "hide",
                "showturtle",
                "hideturtle",
                "getcolor",
                "setcolor",
                "moveto",
                "turntowards",
            ]),
        ),
        (
            "shapes",
            HashSet::from([
                "addrectangle",
                "addellipse",
                "addtriangle",
                "addline",
                "addimage",
                "addtext",
                "settext",
                "remove",
                "move",
                "rotate",
                "zoom",
                "animate",
                "getleft",
                "gettop",
                "getopacity",
                "setopacity",
                "hideshape",
                "showshape",
            ]),
        ),
        ("stack", HashSet::from(["pushvalue", "popvalue", "getcount"])),
        (
            "text",
            HashSet::from([
                "getlength",
                "getsubtext",
                "converttouppercase",
                "converttolowercase",
                "issubtext",
                "append",
                "getcharacter",
                "getcharactercode",
                "getindexof",
                "startswith",
                "endswith",
                "getsubtexttoend",
            ]),
        ),
        ("timer", HashSet::from(["tick", "pause", "resume"])),
        (
            "imagelist",
            HashSet::from(["loadimage", "getwidthofimage", "getheightofimage"]),
        ),
        (
            "flickr",
            HashSet::from([
                "getpictureofmoment",
                "getrandompicture",
                "getpictureofmomentfortag",
            ]),
        ),
        (
            "controls",
            HashSet::from([
                "addbutton",
                "addtextbox",
                "buttonclicked",
                "getbuttoncaption",
                "gettextboxtext",
                "hidecontrol",
                "remove",
                "setbuttoncaption",
                "settextboxtext",
                "showcontrol",
                "texttyped",
            ]),
        ),
        (
            "dictionary",
            HashSet::from([
                "addvalue",
                "containskey",
                "containsvalue",
                "getkeys",
                "getvalue",
                "getvalues",
                "removekey",
            ]),
        ),
        (
            "array",
            HashSet::from([
                "containsindex",
                "containsvalue",
                "getallindices",
                "getitemcount",
                "getvalue",
                "isarray",
                "removevalue",
                "setvalue",
            ]),
        ),
    ])
});

/// Whether the canonical name is a built-in object.
pub fn is_builtin_object(canonical: &str) -> bool {
    BUILTIN_OBJECTS.contains(canonical)
}

/// Member list for a canonical object name, in catalog order.
pub fn members_of(canonical: &str) -> Option<&'static [&'static str]> {
    OBJECT_MEMBERS.get(canonical).map(|v| v.as_slice())
}

/// Whether `member` is a method of `object` (both canonical).
pub fn is_method(object: &str, member: &str) -> bool {
    OBJECT_METHODS
        .get(object)
        .map(|methods| methods.contains(member))
        .unwrap_or(false)
}

/// Whether the canonical name is a reserved keyword or a built-in object.
pub fn is_keyword_or_builtin(canonical: &str) -> bool {
    RESERVED_KEYWORDS.contains(canonical) || BUILTIN_OBJECTS.contains(canonical)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_methods_are_subset_of_members() {
        for (object, methods) in OBJECT_METHODS.iter() {
            let members = members_of(object).unwrap_or_else(|| panic!("no members for {object}"));
            for method in methods {
                assert!(
                    members.contains(method),
                    "method '{method}' of '{object}' missing from member list"
                );
            }
        }
    }

    #[test]
    fn test_every_member_object_is_builtin() {
        for object in OBJECT_MEMBERS.keys() {
            assert!(is_builtin_object(object));
        }
    }

    #[test]
    fn test_lookup_helpers() {
        assert!(is_builtin_object("textwindow"));
        assert!(!is_builtin_object("TextWindow")); // callers lowercase first
        assert!(is_method("textwindow", "writeline"));
        assert!(!is_method("textwindow", "title"));
        assert!(!is_method("desktop", "width"));
        assert!(is_keyword_or_builtin("goto"));
        assert!(is_keyword_or_builtin("label"));
        assert!(!is_keyword_or_builtin("counter"));
    }
}
