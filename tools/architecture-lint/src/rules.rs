//! Yatube's layering rules.
//!
//! Each top-level module under `backend/src` is a layer. The domain owns the
//! entities, the ports and the use-case services. The HTTP adapter (inbound)
//! calls the services only through the driving ports held in `HttpState`,
//! and renders pages only from `inbound/http/pages`. The storage adapters
//! (outbound) implement the driven ports and know nothing of the services
//! or the web.

use std::path::Path;

use crate::CRATE_NAME;

/// Top-level module a source file belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Layer {
    Domain,
    Inbound,
    Outbound,
}

impl Layer {
    pub(crate) const ALL: [Self; 3] = [Self::Domain, Self::Inbound, Self::Outbound];

    /// Directory (and module) name of the layer.
    pub(crate) const fn dir(self) -> &'static str {
        match self {
            Self::Domain => "domain",
            Self::Inbound => "inbound",
            Self::Outbound => "outbound",
        }
    }

    /// Layer of a path relative to `backend/src`.
    pub(crate) fn of(file: &Path) -> Option<Self> {
        let first = file.components().next()?.as_os_str().to_str()?;
        Self::ALL.into_iter().find(|layer| layer.dir() == first)
    }

    pub(crate) const fn rules(self) -> &'static [Rule] {
        match self {
            Self::Domain => DOMAIN_RULES,
            Self::Inbound => INBOUND_RULES,
            Self::Outbound => OUTBOUND_RULES,
        }
    }
}

const WEB_CRATES: &[&str] = &[
    "actix_http",
    "actix_multipart",
    "actix_service",
    "actix_session",
    "actix_web",
];
const TEMPLATE_CRATES: &[&str] = &["askama"];
const STORAGE_CRATES: &[&str] = &["cap_std", "diesel", "diesel_async", "diesel_migrations"];

/// Concrete use-case services, wired together only by `server`.
const DOMAIN_SERVICES: &[&str] = &[
    "AdminService",
    "FeedQueryService",
    "FollowCommandService",
    "PasswordLoginService",
    "PostCommandService",
];
/// Ports the services implement for the HTTP adapter.
const DRIVING_PORTS: &[&str] = &["FeedQuery", "FollowCommand", "LoginService", "PostCommand"];
/// Ports the storage adapters implement for the services.
const STORAGE_PORTS: &[&str] = &[
    "CommentRepository",
    "FollowRepository",
    "GroupRepository",
    "MediaStore",
    "PostRepository",
    "UserRepository",
];

/// Module that owns every askama template.
pub(crate) const PAGES_MODULE: &str = "inbound/http/pages";

const DOMAIN_RULES: &[Rule] = &[
    Rule::NoLayer(Layer::Inbound),
    Rule::NoLayer(Layer::Outbound),
    Rule::NoCrates {
        kind: "web",
        crates: WEB_CRATES,
    },
    Rule::NoCrates {
        kind: "template",
        crates: TEMPLATE_CRATES,
    },
    Rule::NoCrates {
        kind: "storage",
        crates: STORAGE_CRATES,
    },
];

const INBOUND_RULES: &[Rule] = &[
    Rule::NoLayer(Layer::Outbound),
    Rule::NoCrates {
        kind: "storage",
        crates: STORAGE_CRATES,
    },
    Rule::NoItems {
        kind: "domain service",
        items: DOMAIN_SERVICES,
    },
    Rule::NoItems {
        kind: "storage port",
        items: STORAGE_PORTS,
    },
    Rule::TemplatesOnlyIn(PAGES_MODULE),
];

const OUTBOUND_RULES: &[Rule] = &[
    Rule::NoLayer(Layer::Inbound),
    Rule::NoCrates {
        kind: "web",
        crates: WEB_CRATES,
    },
    Rule::NoCrates {
        kind: "template",
        crates: TEMPLATE_CRATES,
    },
    Rule::NoItems {
        kind: "domain service",
        items: DOMAIN_SERVICES,
    },
    Rule::NoItems {
        kind: "driving port",
        items: DRIVING_PORTS,
    },
];

/// One constraint on the paths a layer may mention.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Rule {
    /// Never reach into the given sibling layer.
    NoLayer(Layer),
    /// Never use these external crates.
    NoCrates {
        kind: &'static str,
        crates: &'static [&'static str],
    },
    /// Never name these domain items, however they are imported.
    NoItems {
        kind: &'static str,
        items: &'static [&'static str],
    },
    /// askama may only be used inside the given module.
    TemplatesOnlyIn(&'static str),
}

impl Rule {
    /// Describe how `path`, mentioned in `file`, breaks this rule.
    pub(crate) fn check(self, file: &Path, path: &[String]) -> Option<String> {
        match self {
            Self::NoLayer(layer) => (internal_root(path) == Some(layer.dir()))
                .then(|| format!("must not depend on crate::{}", layer.dir())),
            Self::NoCrates { kind, crates } => external_root(path)
                .filter(|root| crates.contains(root))
                .map(|root| format!("must not use {kind} crate `{root}`")),
            Self::NoItems { kind, items } => path
                .iter()
                .find(|segment| items.contains(&segment.as_str()))
                .map(|item| format!("must not name {kind} `{item}`")),
            Self::TemplatesOnlyIn(module) => (external_root(path) == Some("askama")
                && !within(file, module))
            .then(|| format!("must leave askama templates to {module}")),
        }
    }
}

fn within(file: &Path, module: &str) -> bool {
    file.starts_with(module) || file.with_extension("") == Path::new(module)
}

fn is_relative(segment: &str) -> bool {
    matches!(segment, "crate" | "self" | "super")
}

fn is_layer(segment: &str) -> bool {
    Layer::ALL.iter().any(|layer| layer.dir() == segment)
}

/// Layer named by a crate-internal path such as `crate::outbound::memory`.
fn internal_root(path: &[String]) -> Option<&str> {
    let first = path.first()?.as_str();
    let rest = if first == CRATE_NAME {
        path.get(1..)?
    } else {
        let skip = path.iter().take_while(|segment| is_relative(segment)).count();
        path.get(skip..)?
    };
    rest.first().map(String::as_str).filter(|root| is_layer(root))
}

/// External crate a path starts from, if it starts from one.
fn external_root(path: &[String]) -> Option<&str> {
    let first = path.first()?.as_str();
    (!is_relative(first) && first != CRATE_NAME && !is_layer(first)).then_some(first)
}
