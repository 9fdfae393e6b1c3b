use crate::capabilities::Capabilities;
use crate::descriptor::FeatureTypeDescriptor;
use strum_macros::{AsRefStr, Display, EnumIter, EnumString, IntoStaticStr};

/// The feature types every catalog starts with, outermost first.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, Display, EnumIter, EnumString, IntoStaticStr,
)]
#[strum(serialize_all = "lowercase")]
pub enum BuiltinType {
    Site,
    App,
    Addon,
    View,
    Form,
}

impl BuiltinType {
    #[must_use]
    pub const fn plural(self) -> &'static str {
        match self {
            Self::Site => "sites",
            Self::App => "apps",
            Self::Addon => "addons",
            Self::View => "views",
            Self::Form => "forms",
        }
    }

    #[must_use]
    pub const fn supports(self) -> &'static [&'static str] {
        match self {
            Self::Site => &["apps", "addons", "views", "forms"],
            Self::App => &["addons", "views", "forms"],
            Self::Addon => &["views", "forms"],
            Self::View => &["forms"],
            Self::Form => &[],
        }
    }

    #[must_use]
    pub const fn capabilities(self) -> Capabilities {
        match self {
            Self::Site => Capabilities::ROUTABLE,
            Self::App | Self::Addon | Self::View => {
                Capabilities::ROUTABLE.union(Capabilities::CONTEXTUAL)
            },
            Self::Form => Capabilities::empty(),
        }
    }

    #[must_use]
    pub const fn is_singleton(self) -> bool {
        matches!(self, Self::Site)
    }

    #[must_use]
    pub fn descriptor(self) -> FeatureTypeDescriptor {
        let type_name: &'static str = self.into();
        FeatureTypeDescriptor::builder()
            .type_name(type_name)
            .plural(self.plural())
            .supports(self.supports().iter().map(|p| (*p).to_owned()).collect())
            .capabilities(self.capabilities())
            .singleton(self.is_singleton())
            .build()
    }
}
