//! Procedural macros for custom clsim activities.  A custom activity body
//! derives `SerializableActivity` and is registered once with `register!`,
//! after which scenarios can refer to it by its type name.

use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, DeriveInput, Ident};

/// Implements `SerializableActivity` for an activity body, reporting the
/// struct name as the activity `type` and its serde fields as the
/// activity's configuration.  Also adds the `from_value` constructor the
/// activity factory calls with the configuration found in a scenario.
///
/// The deriving struct must implement `Serialize`, `Deserialize` and
/// `ActivityModel`, with `ActivityModel` and `SerializableActivity` in
/// scope.
#[proc_macro_derive(SerializableActivity)]
pub fn serializable_activity(item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    let body = input.ident;
    let tokens = quote! {
        impl #body {
            pub fn from_value(configuration: serde_yaml::Value) -> Option<Box<dyn ActivityModel>> {
                serde_yaml::from_value::<Self>(configuration)
                    .ok()
                    .map(|body| Box::new(body) as Box<dyn ActivityModel>)
            }
        }
        impl SerializableActivity for #body {
            fn get_type(&self) -> &'static str {
                stringify!(#body)
            }
            fn serialize(&self) -> serde_yaml::Value {
                serde_yaml::to_value(self).unwrap_or(serde_yaml::Value::Null)
            }
        }
    };
    tokens.into()
}

/// Adds a custom activity body to the activity factory under its type
/// name, so scenarios loaded afterwards can use it.
///
/// ```ignore
/// register![RefuelActivity];
/// ```
#[proc_macro]
pub fn register(item: TokenStream) -> TokenStream {
    let body = parse_macro_input!(item as Ident);
    let tokens = quote! {
        clsim::activities::activity_factory::register(
            stringify!(#body),
            #body::from_value as clsim::activities::activity_factory::ActivityConstructor
        );
    };
    tokens.into()
}
