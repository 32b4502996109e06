#![allow(clippy::too_many_lines)]
//! Street suffix lexicon.
//!
//! Maps each canonical street suffix to the abbreviations and common
//! misspellings seen in the wild. Derived from USPS Publication 28
//! (Appendix C1) with additional variants observed in county address
//! exports.

use std::collections::BTreeMap;
use std::sync::LazyLock;

/// A canonical suffix with its known alternate spellings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuffixEntry {
    /// Canonical lower-case form (e.g., `"avenue"`).
    pub canonical: String,
    /// Known spellings, including the canonical form itself.
    pub alternates: Vec<String>,
}

/// An immutable suffix vocabulary.
///
/// Iteration order is the order entries were supplied in. The fuzzy
/// resolver relies on it to break ties between equally scored entries.
#[derive(Debug, Clone, Default)]
pub struct SuffixLexicon {
    entries: Vec<SuffixEntry>,
    by_canonical: BTreeMap<String, usize>,
    by_alternate: BTreeMap<String, usize>,
}

impl SuffixLexicon {
    /// Builds a lexicon from `(canonical, alternates)` pairs.
    ///
    /// Terms are lower-cased. A canonical term that appears twice keeps
    /// its first position and merges the alternates. An alternate shared
    /// by several entries resolves to the first entry that lists it.
    #[must_use]
    pub fn new<I, K, A, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, A)>,
        K: AsRef<str>,
        A: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut lexicon = Self::default();

        for (canonical, alternates) in entries {
            let canonical = canonical.as_ref().trim().to_lowercase();
            let idx = if let Some(&idx) = lexicon.by_canonical.get(&canonical) {
                idx
            } else {
                lexicon.entries.push(SuffixEntry {
                    canonical: canonical.clone(),
                    alternates: Vec::new(),
                });
                let idx = lexicon.entries.len() - 1;
                lexicon.by_canonical.insert(canonical, idx);
                idx
            };

            let entry = &mut lexicon.entries[idx];
            for alt in alternates {
                let alt = alt.as_ref().trim().to_lowercase();
                if alt.is_empty() || entry.alternates.contains(&alt) {
                    continue;
                }
                lexicon.by_alternate.entry(alt.clone()).or_insert(idx);
                entry.alternates.push(alt);
            }
        }

        lexicon
    }

    /// The process-wide USPS-derived suffix lexicon.
    #[must_use]
    pub fn usps() -> &'static Self {
        &USPS_LEXICON
    }

    /// Returns `true` if `term` is a canonical suffix.
    #[must_use]
    pub fn contains_canonical(&self, term: &str) -> bool {
        self.by_canonical.contains_key(term)
    }

    /// Returns `true` if `term` is a canonical suffix or one of the known
    /// alternate spellings.
    #[must_use]
    pub fn is_suffix(&self, term: &str) -> bool {
        self.by_canonical.contains_key(term) || self.by_alternate.contains_key(term)
    }

    /// Returns the canonical form for an exact alternate spelling.
    #[must_use]
    pub fn canonical_for(&self, term: &str) -> Option<&str> {
        self.by_canonical
            .get(term)
            .or_else(|| self.by_alternate.get(term))
            .map(|&idx| self.entries[idx].canonical.as_str())
    }

    /// Returns the alternates listed for a canonical suffix.
    #[must_use]
    pub fn alternates(&self, canonical: &str) -> Option<&[String]> {
        self.by_canonical
            .get(canonical)
            .map(|&idx| self.entries[idx].alternates.as_slice())
    }

    /// Iterates over entries in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &SuffixEntry> {
        self.entries.iter()
    }

    /// Number of canonical suffixes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the lexicon has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

static USPS_LEXICON: LazyLock<SuffixLexicon> =
    LazyLock::new(|| SuffixLexicon::new(USPS_SUFFIXES.iter().map(|(k, v)| (*k, v.iter()))));

/// Canonical suffix → alternates. Mostly alphabetical; the order is
/// significant for fuzzy tie-breaking.
const USPS_SUFFIXES: &[(&str, &[&str])] = &[
    ("alley", &["allee", "alley", "ally", "aly"]),
    ("annex", &["anex", "annex", "annx", "anx"]),
    ("arcade", &["arc", "arcade"]),
    ("avenue", &["av", "ave", "aven", "avenu", "avenue", "avn", "avnue"]),
    ("bayou", &["bayoo", "bayou", "byu"]),
    ("beach", &["bch", "beach"]),
    ("bend", &["bend", "bnd"]),
    ("bluff", &["blf", "bluf", "bluff"]),
    ("bluffs", &["blfs", "bluffs"]),
    ("bottom", &["bot", "bottm", "bottom", "btm"]),
    ("boulevard", &["bl", "blvd", "boul", "boulevard", "boulv"]),
    ("branch", &["br", "branch", "brnch"]),
    ("bridge", &["brdge", "brg", "bridge"]),
    ("brook", &["brk", "brook"]),
    ("brooks", &["brks", "brooks"]),
    ("burg", &["bg", "burg"]),
    ("burgs", &["bgs", "burgs"]),
    ("bypass", &["byp", "bypa", "bypas", "bypass", "byps"]),
    ("camp", &["camp", "cmp", "cp"]),
    ("canyon", &["canyn", "canyon", "cnyn", "cyn"]),
    ("cape", &["cape", "cpe"]),
    ("causeway", &["causeway", "causwa", "causway", "cswy"]),
    ("center", &["cen", "cent", "center", "centr", "centre", "cnter", "cntr", "ctr"]),
    ("centers", &["centers", "ctrs"]),
    ("circle", &["ci", "cir", "circ", "circl", "circle", "crcl", "crcle"]),
    ("circles", &["circles", "cirs"]),
    ("cliff", &["clf", "cliff"]),
    ("cliffs", &["clfs", "cliffs"]),
    ("club", &["clb", "club"]),
    ("common", &["cmn", "common"]),
    ("commons", &["cmns", "commons"]),
    ("corner", &["cor", "corner", "cr"]),
    ("corners", &["corners", "cors"]),
    ("course", &["course", "crse"]),
    ("court", &["court", "crt", "ct"]),
    ("courts", &["courts", "cts"]),
    ("cove", &["cove", "cv"]),
    ("coves", &["coves", "cvs"]),
    ("creek", &["ck", "creek", "crk"]),
    ("crescent", &["crecent", "cres", "crescent", "cresent", "crscnt", "crsent", "crsnt"]),
    ("crest", &["crest", "crst"]),
    ("crossing", &["crossing", "crssing", "crssng", "xing"]),
    ("crossroad", &["crossroad", "xrd"]),
    ("crossroads", &["crossroads", "xrds"]),
    ("curve", &["curv", "curve"]),
    ("dale", &["dale", "dl"]),
    ("dam", &["dam", "dm"]),
    ("divide", &["div", "divide", "dv", "dvd"]),
    ("drive", &["dr", "driv", "drive", "drv"]),
    ("drives", &["drives", "drs"]),
    ("estate", &["est", "estate"]),
    ("estates", &["estates", "ests"]),
    ("expressway", &["exp", "expr", "express", "expressway", "expw", "expwy", "expy"]),
    ("extension", &["ext", "extension", "extn", "extnsn"]),
    ("extensions", &["extensions", "exts"]),
    ("fall", &["fall"]),
    ("falls", &["falls", "fls"]),
    ("ferry", &["ferry", "frry", "fry"]),
    ("field", &["field", "fld"]),
    ("fields", &["fields", "flds"]),
    ("flat", &["flat", "flt"]),
    ("flats", &["flats", "flts"]),
    ("ford", &["ford", "frd"]),
    ("fords", &["fords", "frds"]),
    ("forest", &["forest", "forests", "frst"]),
    ("forge", &["forg", "forge", "frg"]),
    ("forges", &["forges", "frgs"]),
    ("fork", &["fork", "frk"]),
    ("forks", &["forks", "frks"]),
    ("fort", &["fort", "frt", "ft"]),
    ("freeway", &["freeway", "freewy", "frway", "frwy", "fwy"]),
    ("garden", &["garden", "gardn", "gdn", "grden", "grdn"]),
    ("gardens", &["gardens", "gdns", "grdns"]),
    ("gateway", &["gateway", "gatewy", "gatway", "gtway", "gtwy"]),
    ("glen", &["glen", "gln"]),
    ("glens", &["glens", "glns"]),
    ("green", &["green", "grn"]),
    ("greens", &["greens", "grns"]),
    ("grove", &["grov", "grove", "grv"]),
    ("groves", &["groves", "grvs"]),
    ("harbor", &["harb", "harbor", "harbr", "hbr", "hrbor"]),
    ("harbors", &["harbors", "hbrs"]),
    ("haven", &["haven", "havn", "hvn"]),
    ("heights", &["heights", "hgts", "ht", "hts"]),
    ("highway", &["highway", "highwy", "hiway", "hiwy", "hway", "hwy"]),
    ("hill", &["hill", "hl"]),
    ("hills", &["hills", "hls"]),
    ("hollow", &["hllw", "hollow", "hollows", "holw", "holws"]),
    ("inlet", &["inlet", "inlt"]),
    ("island", &["is", "island", "islnd"]),
    ("islands", &["islands", "islnds", "iss"]),
    ("isle", &["isle"]),
    ("isles", &["isles"]),
    ("junction", &["jct", "jction", "jctn", "junction", "junctn", "juncton"]),
    ("junctions", &["jctns", "jcts", "junctions"]),
    ("key", &["key", "ky"]),
    ("keys", &["keys", "kys"]),
    ("knoll", &["knl", "knol", "knoll"]),
    ("knolls", &["knls", "knolls"]),
    ("lake", &["lake", "lk"]),
    ("lakes", &["lakes", "lks"]),
    ("land", &["land"]),
    ("landing", &["landing", "lndg", "lndng"]),
    ("lane", &["la", "lane", "ln"]),
    ("lanes", &["lanes", "lns"]),
    ("light", &["lgt", "light"]),
    ("lights", &["lgts", "lights"]),
    ("loaf", &["lf", "loaf"]),
    ("lock", &["lck", "lock"]),
    ("locks", &["lcks", "locks"]),
    ("lodge", &["ldg", "ldge", "lodg", "lodge"]),
    ("loop", &["loop", "lp"]),
    ("loops", &["loops", "lps"]),
    ("mall", &["mall"]),
    ("manor", &["manor", "mnr"]),
    ("manors", &["manors", "mnrs"]),
    ("meadow", &["mdw", "meadow"]),
    ("meadows", &["mdws", "meadows", "medows"]),
    ("mews", &["mews"]),
    ("mill", &["mill", "ml"]),
    ("mills", &["mills", "mls"]),
    ("mission", &["mission", "missn", "msn", "mssn"]),
    ("motorway", &["motorway", "mtwy"]),
    ("mount", &["mount", "mt"]),
    ("mountain", &["mn", "mntain", "mntn", "mountain", "mountin", "mtin", "mtn"]),
    ("mountains", &["mns", "mntns", "mountains", "mtins", "mtns"]),
    ("neck", &["nck", "neck"]),
    ("orchard", &["orch", "orchard", "orchrd"]),
    ("overlook", &["olk", "overlk", "overlook", "ovlk", "ovlkn"]),
    ("oval", &["oval", "ovl"]),
    ("overpass", &["opas", "overpass"]),
    ("park", &["park", "prk"]),
    ("parks", &["park", "parks"]),
    ("parkway", &["parkway", "parkwy", "pkway", "pkwy", "pky", "pw", "pwy"]),
    ("parkways", &["parkways", "pkwys"]),
    ("pass", &["pass"]),
    ("passage", &["passage", "psge"]),
    ("path", &["path"]),
    ("paths", &["paths"]),
    ("pike", &["pike", "pk"]),
    ("pikes", &["pikes", "pks"]),
    ("pine", &["pine", "pne"]),
    ("pines", &["pines", "pnes"]),
    ("place", &["pl", "place"]),
    ("plain", &["plain", "pln"]),
    ("plains", &["plaines", "plains", "plns"]),
    ("plaza", &["plaza", "plz", "plza"]),
    ("point", &["point", "pt"]),
    ("points", &["points", "pts"]),
    ("port", &["port", "prt"]),
    ("ports", &["ports", "prts"]),
    ("prairie", &["pr", "prairie", "prarie", "prr"]),
    ("radial", &["rad", "radial", "radiel", "radl"]),
    ("ramp", &["ramp"]),
    ("ranch", &["ranch", "rnch"]),
    ("ranches", &["ranches", "rnchs"]),
    ("rapid", &["rapid", "rpd"]),
    ("rapids", &["rapids", "rpds"]),
    ("rest", &["rest", "rst"]),
    ("ridge", &["rdg", "rdge", "ri", "ridge"]),
    ("ridges", &["rdgs", "ridges"]),
    ("river", &["riv", "river", "rivr", "rvr"]),
    ("road", &["rd", "road"]),
    ("roads", &["rds", "roads"]),
    ("route", &["route", "rte"]),
    ("row", &["row"]),
    ("rue", &["rue"]),
    ("run", &["rn", "run"]),
    ("shoal", &["shl", "shoal"]),
    ("shoals", &["shls", "shoals"]),
    ("shore", &["shoar", "shore", "shr"]),
    ("shores", &["shoars", "shores", "shrs"]),
    ("skyway", &["skwy", "skyway"]),
    ("spring", &["spg", "spng", "spring", "sprng"]),
    ("springs", &["spgs", "spngs", "springs", "sprngs"]),
    ("spur", &["spur"]),
    ("spurs", &["spurs"]),
    ("square", &["sq", "sqr", "sqre", "squ", "square"]),
    ("squares", &["sqrs", "sqs", "squares"]),
    ("station", &["sta", "station", "statn", "stn"]),
    ("strasse", &["strasse"]),
    ("stravenue", &["stra", "strav", "straven", "stravenue", "stravn", "strvn", "strvnue"]),
    ("stream", &["stream", "streme", "strm"]),
    ("street", &["st", "str", "street", "strt"]),
    ("streets", &["streets", "sts"]),
    ("summit", &["smt", "sumit", "sumitt", "summit"]),
    ("terrace", &["ter", "terr", "terrace"]),
    ("throughway", &["throughway", "trwy"]),
    ("trace", &["trace", "traces", "trce"]),
    ("track", &["track", "tracks", "trak", "trk", "trks"]),
    ("trafficway", &["trafficway", "trfy"]),
    ("trail", &["tr", "trail", "trl"]),
    ("trails", &["trails", "trls"]),
    ("trailer", &["trailer", "trlr"]),
    ("trailers", &["trailers", "trlrs"]),
    ("tunnel", &["tl", "tunel", "tunl", "tunnel", "tunnl"]),
    ("tunnels", &["tunls", "tunnels"]),
    ("turnpike", &["tpk", "tpke", "trnpk", "trpk", "turnpike", "turnpk"]),
    ("underpass", &["underpass", "upas"]),
    ("union", &["un", "union"]),
    ("unions", &["unions", "uns"]),
    ("valley", &["valley", "vally", "vlly", "vly"]),
    ("valleys", &["valleys", "vlys"]),
    ("via", &["via"]),
    ("viaduct", &["vdct", "via", "viadct", "viaduct"]),
    ("view", &["view", "vw"]),
    ("views", &["views", "vws"]),
    ("village", &["vill", "villag", "village", "villg", "villiage", "vlg"]),
    ("villages", &["villages", "vlgs"]),
    ("ville", &["ville", "vl"]),
    ("vista", &["vis", "vist", "vista", "vst", "vsta"]),
    ("walk", &["walk"]),
    ("walks", &["walks"]),
    ("wall", &["wall"]),
    ("way", &["way", "wy"]),
    ("well", &["well", "wl"]),
    ("wells", &["wells", "wls"]),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_canonical_is_its_own_alternate() {
        for entry in SuffixLexicon::usps().iter() {
            assert!(
                entry.alternates.contains(&entry.canonical),
                "{} missing from its own alternates",
                entry.canonical
            );
        }
    }

    #[test]
    fn canonical_terms_are_unique_and_keep_declaration_order() {
        let lexicon = SuffixLexicon::usps();
        assert_eq!(lexicon.len(), USPS_SUFFIXES.len());
        let names: Vec<&str> = lexicon.iter().map(|e| e.canonical.as_str()).collect();
        let declared: Vec<&str> = USPS_SUFFIXES.iter().map(|(k, _)| *k).collect();
        assert_eq!(names, declared);
    }

    #[test]
    fn table_covers_every_usps_suffix() {
        let lexicon = SuffixLexicon::usps();
        assert_eq!(lexicon.len(), 217);
        let first = lexicon.iter().next().map(|e| e.canonical.as_str());
        let last = lexicon.iter().last().map(|e| e.canonical.as_str());
        assert_eq!(first, Some("alley"));
        assert_eq!(last, Some("wells"));
        assert_eq!(lexicon.canonical_for("wls"), Some("wells"));
    }

    #[test]
    fn looks_up_common_abbreviations() {
        let lexicon = SuffixLexicon::usps();
        assert_eq!(lexicon.canonical_for("st"), Some("street"));
        assert_eq!(lexicon.canonical_for("ave"), Some("avenue"));
        assert_eq!(lexicon.canonical_for("blvd"), Some("boulevard"));
        assert_eq!(lexicon.canonical_for("boulv"), Some("boulevard"));
        assert_eq!(lexicon.canonical_for("pkwy"), Some("parkway"));
        assert_eq!(lexicon.canonical_for("main"), None);
    }

    #[test]
    fn shared_alternate_resolves_to_canonical_entry_first() {
        let lexicon = SuffixLexicon::usps();
        // "park" is listed under both "park" and "parks"; "via" under
        // both "via" and "viaduct".
        assert_eq!(lexicon.canonical_for("park"), Some("park"));
        assert_eq!(lexicon.canonical_for("via"), Some("via"));
    }

    #[test]
    fn custom_lexicon_lowercases_and_merges() {
        let lexicon = SuffixLexicon::new([
            ("Road", vec!["RD"]),
            ("road", vec!["rd", "rod"]),
            ("lane", vec!["ln"]),
        ]);
        assert_eq!(lexicon.len(), 2);
        assert_eq!(
            lexicon.alternates("road"),
            Some(["rd".to_string(), "rod".to_string()].as_slice())
        );
        assert!(lexicon.is_suffix("ln"));
        assert!(lexicon.contains_canonical("lane"));
        assert!(!lexicon.contains_canonical("ln"));
    }
}
