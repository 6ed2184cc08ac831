//! `${BUZZWORD}` and `${BUZZWORD:<sentences>}`: corporate filler text.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use regex::{Captures, Regex};
use std::cell::RefCell;
use std::collections::BTreeMap;

use crate::enhancement::provider::{variable_pattern, EnhancementProvider, Expansion};

const ADVERBS: &[&str] = &[
    "appropriately", "assertively", "authoritatively", "collaboratively",
    "compellingly", "competently", "completely", "continually", "conveniently",
    "credibly", "distinctively", "dramatically", "dynamically", "efficiently",
    "energistically", "enthusiastically", "fungibly", "globally", "holisticly",
    "interactively", "intrinsically", "monotonectally", "objectively",
    "phosfluorescently", "proactively", "professionally", "progressively",
    "quickly", "rapidiously", "seamlessly", "synergistically", "uniquely",
];

const VERBS: &[&str] = &[
    "actualize", "administrate", "aggregate", "architect", "benchmark", "brand",
    "build", "cloudify", "communicate", "conceptualize", "coordinate", "create",
    "cultivate", "customize", "deliver", "deploy", "develop", "disseminate",
    "drive", "embrace", "e-enable", "empower", "enable", "engage", "engineer",
    "enhance", "envisioneer", "evisculate", "evolve", "expedite", "exploit",
    "extend", "fabricate", "facilitate", "fashion", "formulate", "foster",
    "generate", "grow", "harness", "impact", "implement", "incentivize",
    "incubate", "initiate", "innovate", "integrate", "iterate",
    "leverage existing", "leverage other's", "maintain", "matrix", "maximize",
    "mesh", "monetize", "morph", "myocardinate", "negotiate", "network",
    "optimize", "orchestrate", "parallel task", "plagiarize", "pontificate",
    "predominate", "procrastinate", "productivate", "productize", "promote",
    "provide access to", "pursue", "recaptiualize", "reconceptualize",
    "redefine", "re-engineer", "reintermediate", "reinvent", "repurpose",
    "restore", "revolutionize", "right-shore", "scale", "seize", "simplify",
    "strategize", "streamline", "supply", "syndicate", "synergize",
    "synthesize", "target", "transform", "transition", "underwhelm", "unleash",
    "utilize", "visualize", "whiteboard",
];

const ADJECTIVES: &[&str] = &[
    "24/7", "24/365", "accurate", "adaptive", "agile", "alternative",
    "an expanded array of", "B2B", "B2C", "backend", "backward-compatible",
    "best-of-breed", "bleeding-edge", "bricks-and-clicks", "business",
    "clicks-and-mortar", "client-based", "client-centered", "client-centric",
    "client-focused", "cloud-based", "cloud-centric", "cloudified",
    "collaborative", "compelling", "competitive", "cooperative", "corporate",
    "cost effective", "covalent", "cross functional", "cross-media",
    "cross-platform", "cross-unit", "customer directed", "customized",
    "cutting-edge", "distinctive", "distributed", "diverse", "dynamic",
    "e-business", "economically sound", "effective", "efficient", "elastic",
    "emerging", "empowered", "enabled", "end-to-end", "enterprise",
    "enterprise-wide", "equity invested", "error-free", "ethical", "excellent",
    "exceptional", "extensible", "extensive", "flexible", "focused",
    "frictionless", "front-end", "fully researched", "fully tested",
    "functional", "functionalized", "fungible", "future-proof", "global",
    "go forward", "goal-oriented", "granular", "high standards in",
    "high-payoff", "hyperscale", "high-quality", "highly efficient", "holistic",
    "impactful", "inexpensive", "innovative", "installed base", "integrated",
    "interactive", "interdependent", "intermandated", "interoperable",
    "intuitive", "just in time", "leading-edge", "leveraged",
    "long-term high-impact", "low-risk high-yield", "magnetic", "maintainable",
    "market positioning", "market-driven", "mission-critical",
    "multidisciplinary", "multifunctional", "multimedia based",
    "next-generation", "on-demand", "one-to-one", "open-source", "optimal",
    "orthogonal", "out-of-the-box", "pandemic", "parallel", "performance based",
    "plug-and-play", "premier", "premium", "principle-centered", "proactive",
    "process-centric", "professional", "progressive", "prospective", "quality",
    "real-time", "reliable", "resource-sucking", "resource-maximizing",
    "resource-leveling", "revolutionary", "robust", "scalable", "seamless",
    "stand-alone", "standardized", "standards compliant", "state of the art",
    "sticky", "strategic", "superior", "sustainable", "synergistic", "tactical",
    "team building", "team driven", "technically sound", "timely", "top-line",
    "transparent", "turnkey", "ubiquitous", "unique", "user-centric",
    "user friendly", "value-added", "vertical", "viral", "virtual", "visionary",
    "web-enabled", "wireless", "world-class", "worldwide",
];

const NOUNS: &[&str] = &[
    "action items", "alignments", "applications", "architectures", "bandwidth",
    "benefits", "best practices", "catalysts for change", "channels", "clouds",
    "collaboration and idea-sharing", "communities", "content", "convergence",
    "core competencies", "customer service", "data", "deliverables",
    "e-business", "e-commerce", "e-markets", "e-tailers", "e-services",
    "experiences", "expertise", "functionalities", "fungibility",
    "growth strategies", "human capital", "ideas", "imperatives",
    "infomediaries", "information", "infrastructures", "initiatives",
    "innovation", "intellectual capital", "interfaces",
    "internal or \"organic\" sources", "leadership", "leadership skills",
    "manufactured products", "markets", "materials", "meta-services",
    "methodologies", "methods of empowerment", "metrics", "mindshare", "models",
    "networks", "niches", "niche markets", "nosql", "opportunities",
    "\"outside the box\" thinking", "outsourcing", "paradigms", "partnerships",
    "platforms", "portals", "potentialities", "process improvements",
    "processes", "products", "quality vectors", "relationships", "resources",
    "results", "ROI", "scenarios", "schemas", "scrums", "services", "solutions",
    "sources", "sprints", "strategic theme areas", "storage", "supply chains",
    "synergy", "systems", "technologies", "technology", "testing procedures",
    "total linkage", "users", "value", "vortals", "web-readiness",
    "web services", "wins", "virtualization",
];

const TRANSITIONALS: &[&str] = &["and", "then", "to"];

/// Generates paragraphs of buzzword sentences.
pub struct BuzzwordProvider {
    pattern: Regex,
    width: usize,
    split_chance: u32,
    rng: RefCell<StdRng>,
}

impl BuzzwordProvider {
    /// `split_chance` is the percentage chance (0-100) that a sentence is
    /// joined to the next with a transitional word.
    pub fn new(width: usize, split_chance: u32) -> Self {
        Self::with_rng(width, split_chance, StdRng::from_entropy())
    }

    /// A provider with a reproducible word sequence.
    pub fn seeded(width: usize, split_chance: u32, seed: u64) -> Self {
        Self::with_rng(width, split_chance, StdRng::seed_from_u64(seed))
    }

    fn with_rng(width: usize, split_chance: u32, rng: StdRng) -> Self {
        Self {
            pattern: variable_pattern("BUZZWORD"),
            width: width.max(1),
            split_chance,
            rng: RefCell::new(rng),
        }
    }

    /// `count` sentences of filler text, unwrapped.
    pub fn ipsum(&self, count: usize) -> String {
        let mut rng = self.rng.borrow_mut();
        let mut text = String::new();
        let mut last_was_split = false;

        for i in 0..count {
            let joins_next = rng.gen_range(0..100) < self.split_chance;
            let adverb = pick(&mut *rng, ADVERBS);
            let verb = pick(&mut *rng, VERBS);
            let adjective = pick(&mut *rng, ADJECTIVES);
            let noun = pick(&mut *rng, NOUNS);

            if last_was_split {
                text.push_str(adverb);
            } else {
                text.push_str(&capitalize(adverb));
            }
            text.push_str(&format!(" {} {} {}", verb, adjective, noun));

            if joins_next && i + 1 != count {
                text.push_str(&format!(", {} ", pick(&mut *rng, TRANSITIONALS)));
                last_was_split = true;
            } else {
                text.push_str(". ");
                last_was_split = false;
            }
        }
        text
    }
}

fn pick<R: Rng>(rng: &mut R, words: &[&'static str]) -> &'static str {
    words.choose(rng).copied().unwrap_or_default()
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Greedy word wrap; whitespace runs collapse to single spaces.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    for word in text.split_whitespace() {
        if !line.is_empty() && line.len() + 1 + word.len() > width {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(word);
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

impl EnhancementProvider for BuzzwordProvider {
    fn variable_name(&self) -> &str {
        "BUZZWORD"
    }

    fn type_name(&self) -> &'static str {
        "BuzzwordProvider"
    }

    fn is_applicable(&self, content: &str) -> bool {
        self.pattern.is_match(content)
    }

    fn expand(&self, content: &str) -> Expansion {
        let mut bindings = BTreeMap::new();
        let content = self
            .pattern
            .replace_all(content, |caps: &Captures| {
                let count = caps
                    .get(1)
                    .and_then(|m| m.as_str()[1..].trim().parse::<usize>().ok())
                    .filter(|n| *n > 0)
                    .unwrap_or(1);
                let name = format!("BUZZWORD_{}", bindings.len());
                let text = wrap(&self.ipsum(count), self.width).join("\n");
                bindings.insert(name.clone(), text);
                format!("${{{}}}", name)
            })
            .into_owned();

        Expansion { bindings, content }
    }
}
