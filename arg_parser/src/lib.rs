extern crate proc_macro;

use proc_macro::TokenStream;
use quote::{quote, format_ident};
use syn::{self, DeriveInput, Type};

#[derive(deluxe::ExtractAttributes, Debug)]
#[deluxe(attributes(metadata))]
struct MetaDataDefinition {
    #[deluxe(default = String::from(""))]
    description: String,

    #[deluxe(default = 1)]
    usage_exit_code: i32,
}

#[derive(deluxe::ExtractAttributes, Debug)]
#[deluxe(attributes(arg))]
struct ArgDefinition {
    #[deluxe(default = String::from(""))]
    short: String,

    #[deluxe(default = String::from(""))]
    long: String,

    #[deluxe(default = String::from(""))]
    description: String,

    #[deluxe(default = false)]
    required: bool,

    #[deluxe(default = false)]
    positional: bool,
}

#[derive(Clone, Copy, PartialEq)]
enum FieldKind {
    Flag,
    Value,
    OptionalValue,
}

struct ArgData {
    field_name: String,
    short: Option<String>,
    long: Option<String>,
    description: String,
    required: bool,
    positional: bool,
    kind: FieldKind,
}

impl ArgData {
    fn from_arg_attribs(field_name: String, attrs: ArgDefinition, kind: FieldKind) -> ArgData {
        ArgData {
            field_name,
            short: non_empty(attrs.short),
            long: non_empty(attrs.long),
            description: attrs.description,
            required: attrs.required,
            positional: attrs.positional,
            kind
        }
    }

    fn patterns(&self) -> Vec<syn::LitStr> {
        self.short.iter()
            .chain(self.long.iter())
            .map(|value| syn::LitStr::new(value, proc_macro2::Span::call_site()))
            .collect()
    }
}

fn non_empty(value: String) -> Option<String> {
    match value.len() {
        0 => None,
        _ => Some(value)
    }
}

fn last_segment_ident(field: &Type) -> Option<String> {
    if let Type::Path(type_path) = field {
        return type_path.path.segments.last().map(|segment| segment.ident.to_string());
    }
    None
}

fn field_kind(field: &Type) -> FieldKind {
    match last_segment_ident(field).as_deref() {
        Some("bool") => FieldKind::Flag,
        Some("Option") => FieldKind::OptionalValue,
        _ => FieldKind::Value
    }
}

/// Field definitions in declaration order, which is also the order positional
/// arguments are filled in.
fn extract_arg_field_attrs(ast: &mut DeriveInput) -> deluxe::Result<Vec<ArgData>> {
    let mut field_attrs: Vec<ArgData> = Vec::new();

    let s = match &mut ast.data {
        syn::Data::Struct(s) => s,
        _ => return Err(syn::Error::new_spanned(&ast.ident, "CmdArgs only supports structs"))
    };

    for field in s.fields.iter_mut() {
        let field_name = match &field.ident {
            Some(ident) => ident.to_string(),
            None => return Err(syn::Error::new_spanned(&field.ty, "CmdArgs requires named fields"))
        };
        let attrs: ArgDefinition = deluxe::extract_attributes(field)?;
        let data = ArgData::from_arg_attribs(field_name, attrs, field_kind(&field.ty));

        if data.positional && data.kind == FieldKind::Flag {
            return Err(syn::Error::new_spanned(&field.ty, "a positional argument cannot be a bool"));
        }
        if !data.positional && data.short.is_none() && data.long.is_none() {
            return Err(syn::Error::new_spanned(&field.ty, "an option needs `short` or `long`"));
        }

        field_attrs.push(data);
    }

    Ok(field_attrs)
}

fn wrap_value(kind: FieldKind, value: proc_macro2::TokenStream) -> proc_macro2::TokenStream {
    match kind {
        FieldKind::OptionalValue => quote! { Some(#value) },
        _ => value
    }
}

fn build_option_arm(index: usize, arg: &ArgData) -> proc_macro2::TokenStream {
    let patterns = arg.patterns();
    let field_name = format_ident!("{}", arg.field_name);
    let set_struct_field = match arg.kind {
        FieldKind::Flag => quote! {
            return_struct.#field_name = true;
        },
        kind => {
            let value = wrap_value(kind, quote! { value.clone() });
            quote! {
                i += 1;
                let value = match args.get(i) {
                    Some(value) if !value.starts_with('-') => value,
                    _ => return Err(format!("[ERROR] '{}' requires an argument to be passed", arg))
                };

                return_struct.#field_name = #value;
            }
        }
    };
    quote! {
        #(#patterns)|* => {
            if processed[#index] {
                return Err(format!("[ERROR] Option '{}' has already been processed", arg));
            }
            processed[#index] = true;

            #set_struct_field
        }
    }
}

fn build_positional_arm(position: usize, index: usize, arg: &ArgData) -> proc_macro2::TokenStream {
    let field_name = format_ident!("{}", arg.field_name);
    let value = wrap_value(arg.kind, quote! { arg.to_owned() });
    quote! {
        #position => {
            processed[#index] = true;
            return_struct.#field_name = #value;
        }
    }
}

fn usage_and_options(meta_data: &MetaDataDefinition, field_attrs: &[ArgData]) -> (String, String) {
    let mut usage_str = String::from("Usage: EXEC_NAME [OPTIONS]");
    let mut options_str = String::from("");

    for attr in field_attrs {
        let name = attr.field_name.to_uppercase();

        if attr.positional {
            if attr.required {
                usage_str += &format!(" <{}>", name);
            } else {
                usage_str += &format!(" [{}]", name);
            }
            options_str += &format!("   {:45} {}", format!("<{}>", name), attr.description);
        } else {
            if attr.required {
                usage_str += &format!(" {} {}", attr.patterns()[0].value(), attr.field_name);
            }
            let parameter = match attr.kind {
                FieldKind::Flag => String::from(""),
                _ => format!("<{}>", name)
            };
            options_str += &format!(
                "   {:03} {:20} {:20} {}",
                attr.short.as_deref().unwrap_or(""),
                attr.long.as_deref().unwrap_or(""),
                parameter,
                attr.description
            );
        }

        if attr.required {
            options_str += " (Required)";
        }
        options_str += "\n";
    }
    options_str += &format!("   {:03} {:20} {:20} {}", "-h", "--help", "", "Displays help");

    if !meta_data.description.is_empty() {
        usage_str += &format!("\n\n{}", &meta_data.description);
    }

    (usage_str, options_str)
}

fn parse_cmd_args_derive2(item: proc_macro2::TokenStream) -> deluxe::Result<proc_macro2::TokenStream> {
    // parse
    let mut ast: DeriveInput = syn::parse2(item)?;
    let meta_data: MetaDataDefinition = deluxe::extract_attributes(&mut ast)?;

    // extract field attributes
    let field_attrs: Vec<ArgData> = extract_arg_field_attrs(&mut ast)?;

    let (usage_str, options_str) = usage_and_options(&meta_data, &field_attrs);
    let usage_exit_code = meta_data.usage_exit_code;
    let options_count = field_attrs.len();
    let required: Vec<bool> = field_attrs.iter().map(|attr| attr.required).collect();

    let option_arms = field_attrs.iter()
        .enumerate()
        .filter(|(_, attr)| !attr.positional)
        .map(|(index, attr)| build_option_arm(index, attr));

    let positional_arms: Vec<proc_macro2::TokenStream> = field_attrs.iter()
        .enumerate()
        .filter(|(_, attr)| attr.positional)
        .enumerate()
        .map(|(position, (index, attr))| build_positional_arm(position, index, attr))
        .collect();
    let positional_count = positional_arms.len();

    let (positional_state, positional_match) = match positional_count {
        0 => (quote! {}, quote! {}),
        _ => (
            quote! { let mut positional_filled: usize = 0; },
            quote! {
                _ if !arg.starts_with('-') && positional_filled < #positional_count => {
                    match positional_filled {
                        #(#positional_arms),*
                        _ => {}
                    }
                    positional_filled += 1;
                }
            }
        )
    };

    let ident = &ast.ident;
    let (impl_generics, type_generics, where_clause) = ast.generics.split_for_impl();

    let code = quote! {
        impl #impl_generics #ident #type_generics #where_clause {
            /// Parses the process arguments. Prints help and exits on `-h`, or
            /// with the usage exit code on invalid arguments.
            pub fn parse() -> #ident #type_generics {
                let args: Vec<String> = std::env::args().skip(1).collect();
                match Self::try_parse_from(args) {
                    Ok(parsed) => parsed,
                    Err(msg) => {
                        let exit_code = if msg.is_empty() {
                            0
                        } else {
                            println!("{}", msg);
                            #usage_exit_code
                        };
                        Self::print_help();
                        std::process::exit(exit_code);
                    }
                }
            }

            pub fn print_help() {
                let exec_name = std::env::current_exe()
                    .ok()
                    .and_then(|path| path.file_name().map(|name| name.to_string_lossy().into_owned()))
                    .unwrap_or_else(|| String::from("EXEC_NAME"));
                println!("{}", #usage_str.replace("EXEC_NAME", &exec_name));
                println!("\nOptions:");
                println!("{}", #options_str);
            }

            /// Parses `args`, not including the executable name. A help request
            /// yields `Err` with an empty message.
            pub fn try_parse_from<I: IntoIterator<Item = String>>(args: I) -> Result<#ident #type_generics, String> {
                let args: Vec<String> = args.into_iter().collect();
                let mut return_struct: #ident #type_generics = Default::default();
                let mut processed = vec![false; #options_count];
                let required: [bool; #options_count] = [#(#required),*];
                #positional_state

                let mut i = 0;
                while i < args.len() {
                    let arg = args[i].as_str();
                    match arg {
                        "-h" | "--help" => return Err(String::new()),
                        #(#option_arms)*
                        #positional_match
                        _ => return Err(format!("[ERROR] '{}' is not a valid option", arg))
                    };
                    i += 1;
                }

                for index in 0..#options_count {
                    if required[index] && !processed[index] {
                        return Err(String::from("[ERROR] not all required options have been provided."));
                    }
                }

                Ok(return_struct)
            }
        }
    };

    Ok(code)
}

#[proc_macro_derive(CmdArgs, attributes(metadata, arg))]
pub fn parse_cmd_args_derive(input: TokenStream) -> TokenStream {
    parse_cmd_args_derive2(input.into())
        .unwrap_or_else(|err| err.into_compile_error())
        .into()
}
