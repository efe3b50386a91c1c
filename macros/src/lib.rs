use proc_macro::TokenStream;
use quote::{format_ident, quote};
use std::collections::HashMap;
use syn::{parse_macro_input, Attribute, Data, DeriveInput, Fields, LitStr, Meta, Token};

/// Helper enum for parsed attribute values
enum MetaValue {
    Str(String),
    Expr(syn::Expr),
    Flag,
}

/// Define a struct whose fields are loaded from environment descriptors
///
/// ```rust,ignore
/// define_env! {
///     #[derive(Debug)]
///     #[env(id = "app")]
///     pub struct AppEnv {
///         #[field(config = env::string("A"), doc = "Greeting")]
///         pub a: String,
///         #[field(config = env::number_or("B", 5.0))]
///         pub b: f64,
///     }
/// }
/// ```
///
/// Generates the struct and an `env_shape::Shape` implementation.
#[proc_macro]
pub fn define_env(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match generate_shape(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn generate_shape(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let struct_name = &input.ident;
    let vis = &input.vis;

    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "define_env! does not support generic structs",
        ));
    }

    let identifier = parse_identifier(&input.attrs)?.unwrap_or_else(|| struct_name.to_string());

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    input,
                    "define_env! only supports structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                input,
                "define_env! only supports structs",
            ));
        }
    };

    let mut field_defs = Vec::new();
    let mut descriptor_defs = Vec::new();
    let mut names = Vec::new();

    for field in fields {
        let Some(field_name) = field.ident.as_ref() else {
            return Err(syn::Error::new_spanned(field, "expected a named field"));
        };
        let field_vis = &field.vis;
        let field_type = &field.ty;

        let config = parse_field_config(field)?;

        // Keep doc comments and other attributes, drop our own
        let kept_attrs: Vec<&Attribute> = field
            .attrs
            .iter()
            .filter(|attr| !attr.path().is_ident("field"))
            .collect();

        field_defs.push(quote! {
            #(#kept_attrs)*
            #field_vis #field_name: #field_type
        });

        let descriptor = &config.descriptor;
        let descriptor = match &config.description {
            Some(doc) => quote! { (#descriptor).describe(#doc) },
            None => quote! { #descriptor },
        };
        descriptor_defs.push(quote! {
            let #field_name: ::env_shape::Config<#field_type> = #descriptor;
        });

        names.push(field_name);
    }

    // Filter out our custom attributes from the struct definition
    let filtered_attrs: Vec<&Attribute> = input
        .attrs
        .iter()
        .filter(|attr| !attr.path().is_ident("env"))
        .collect();

    let struct_def = quote! {
        #(#filtered_attrs)*
        #vis struct #struct_name {
            #(#field_defs),*
        }
    };

    let fields_var = format_ident!("__env_shape_fields");
    let source_var = format_ident!("__env_shape_source");
    let builder_var = format_ident!("__env_shape_builder");

    // An empty shape reads nothing and always loads
    let config_body = if names.is_empty() {
        quote! {
            ::env_shape::Config::from_fn(::std::vec::Vec::new(), |_| ::std::result::Result::Ok(Self {}))
        }
    } else {
        quote! {
                #(#descriptor_defs)*

                let mut #fields_var = ::std::vec::Vec::new();
                #(#fields_var.extend_from_slice(#names.fields());)*

                ::env_shape::Config::from_fn(#fields_var, move |#source_var| {
                    let mut #builder_var = ::env_shape::ShapeBuilder::new(#source_var);

                    #(let #names = #builder_var.field(&#names);)*

                    match (#(#names,)*) {
                        (#(::std::option::Option::Some(#names),)*) => {
                            ::std::result::Result::Ok(Self { #(#names),* })
                        }
                        _ => ::std::result::Result::Err(#builder_var.into_errors()),
                    }
                })
        }
    };

    let shape_impl = quote! {
        impl ::env_shape::Shape for #struct_name {
            const IDENTIFIER: &'static str = #identifier;

            fn config() -> ::env_shape::Config<Self> {
                #config_body
            }
        }
    };

    Ok(quote! {
        #struct_def
        #shape_impl
    })
}

#[derive(Debug)]
struct FieldConfig {
    descriptor: syn::Expr,
    description: Option<String>,
}

/// Parse #[env(id = "name")] on the struct, if present
fn parse_identifier(attrs: &[Attribute]) -> syn::Result<Option<String>> {
    let mut identifier = None;

    for attr in attrs.iter().filter(|attr| attr.path().is_ident("env")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("id") {
                let value: LitStr = meta.value()?.parse()?;
                identifier = Some(value.value());
                Ok(())
            } else {
                Err(meta.error("unsupported env attribute, expected id = \"...\""))
            }
        })?;
    }

    Ok(identifier)
}

/// Parse #[field(config = expr, doc = "Y")] syntax
fn parse_field_list(meta_list: &syn::MetaList) -> syn::Result<HashMap<String, MetaValue>> {
    let mut values = HashMap::new();

    meta_list.parse_nested_meta(|meta| {
        let key = meta
            .path
            .get_ident()
            .ok_or_else(|| meta.error("expected identifier"))?
            .to_string();

        if values.contains_key(&key) {
            return Err(meta.error(format!("duplicate field option `{}`", key)));
        }

        if meta.input.peek(Token![=]) {
            meta.input.parse::<Token![=]>()?;

            if key == "doc" {
                let value: LitStr = meta.input.parse()?;
                values.insert(key, MetaValue::Str(value.value()));
            } else {
                let expr: syn::Expr = meta.input.parse()?;
                values.insert(key, MetaValue::Expr(expr));
            }
        } else {
            values.insert(key, MetaValue::Flag);
        }

        Ok(())
    })?;

    Ok(values)
}

fn parse_field_config(field: &syn::Field) -> syn::Result<FieldConfig> {
    let field_attr = field
        .attrs
        .iter()
        .find(|attr| attr.path().is_ident("field"))
        .ok_or_else(|| {
            syn::Error::new_spanned(
                field,
                "field must have a #[field(config = ...)] attribute",
            )
        })?;

    let parsed = match &field_attr.meta {
        Meta::List(list) => parse_field_list(list)?,
        _ => {
            return Err(syn::Error::new_spanned(
                field_attr,
                "field attribute must be a list: #[field(config = ..., doc = \"...\")]",
            ));
        }
    };

    if let Some(unknown) = parsed.keys().find(|k| *k != "config" && *k != "doc") {
        return Err(syn::Error::new_spanned(
            field_attr,
            format!("unknown field option `{}`, expected config or doc", unknown),
        ));
    }

    let descriptor = match parsed.get("config") {
        Some(MetaValue::Expr(e)) => e.clone(),
        _ => {
            return Err(syn::Error::new_spanned(
                field_attr,
                "field must have config = <descriptor expression>",
            ));
        }
    };

    let description = match parsed.get("doc") {
        Some(MetaValue::Str(s)) => Some(s.trim().to_string()),
        None => None,
        _ => {
            return Err(syn::Error::new_spanned(
                field_attr,
                "doc must be a string literal",
            ));
        }
    };

    Ok(FieldConfig {
        descriptor,
        description,
    })
}
