//! Declarative table of crash-signature category reports.

/// Whether a report's results split by crashing process type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    /// One weighted total per day.
    Scalar,
    /// Weighted totals per process type, plus a `browser` remainder.
    ProcessSplit,
}

/// One named category report and the search filter that selects it.
#[derive(Debug, Clone, Copy)]
pub struct CategoryRule {
    /// Report name; doubles as the bucket key in the persisted store.
    pub name: &'static str,
    /// Filter parameters merged into the standard product/version/date
    /// query, as repeated keys.
    pub filters: &'static [(&'static str, &'static [&'static str])],
    /// Scalar total or per-process split.
    pub kind: RuleKind,
    /// Restricts the report to desktop products.
    pub desktop_only: bool,
}

impl CategoryRule {
    /// Whether the rule runs for a product with the given desktop flag.
    pub const fn applies_to(&self, desktop_product: bool) -> bool {
        !self.desktop_only || desktop_product
    }
}

/// Category reports processed for every (product, channel, day).
pub const CATEGORY_RULES: &[CategoryRule] = &[
    CategoryRule {
        name: "startup",
        filters: &[("uptime", &["<60"])],
        kind: RuleKind::ProcessSplit,
        desktop_only: false,
    },
    CategoryRule {
        name: "oom",
        filters: &[(
            "signature",
            &["^js::AutoEnterOOMUnsafeRegion::crash", "^OOM |"],
        )],
        kind: RuleKind::ProcessSplit,
        desktop_only: false,
    },
    CategoryRule {
        name: "oom:small",
        filters: &[("signature", &["=OOM | small"])],
        kind: RuleKind::ProcessSplit,
        desktop_only: false,
    },
    CategoryRule {
        name: "oom:large",
        filters: &[("signature", &["^OOM | large |"])],
        kind: RuleKind::ProcessSplit,
        desktop_only: false,
    },
    CategoryRule {
        name: "shutdownhang",
        filters: &[("signature", &["^shutdownhang |"])],
        kind: RuleKind::Scalar,
        desktop_only: true,
    },
    // Signatures that start with a bare @0xFOOBAR address. A leading zero
    // is not displayed, so matching the exact `@0x0` plus every nonzero
    // leading hex digit covers the space without a regex operator.
    CategoryRule {
        name: "address:pure",
        filters: &[(
            "signature",
            &[
                "=@0x0", "^@0x1", "^@0x2", "^@0x3", "^@0x4", "^@0x5", "^@0x6", "^@0x7",
                "^@0x8", "^@0x9", "^@0xa", "^@0xb", "^@0xc", "^@0xd", "^@0xe", "^@0xf",
            ],
        )],
        kind: RuleKind::ProcessSplit,
        desktop_only: true,
    },
];
