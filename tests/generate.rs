//! End-to-end generation tests over in-memory descriptor sets.

use protolisp::descriptor::{
    DescriptorProto, EnumDescriptorProto, EnumValueDescriptorProto, FieldDescriptorProto,
    FieldOptions, FileDescriptorProto, Label, MessageOptions, MethodDescriptorProto,
    OneofDescriptorProto, ServiceDescriptorProto, Type,
};
use protolisp::{generate, Error, GeneratedFile, GeneratorOptions};

fn file(name: &str, package: &str, syntax: &str) -> FileDescriptorProto {
    FileDescriptorProto {
        name: Some(name.into()),
        package: Some(package.into()),
        syntax: Some(syntax.into()),
        ..Default::default()
    }
}

fn message(name: &str, field: Vec<FieldDescriptorProto>) -> DescriptorProto {
    DescriptorProto {
        name: Some(name.into()),
        field,
        ..Default::default()
    }
}

fn scalar(name: &str, number: i32, ty: Type) -> FieldDescriptorProto {
    FieldDescriptorProto {
        name: Some(name.into()),
        number: Some(number),
        label: Some(Label::Optional as i32),
        r#type: Some(ty as i32),
        ..Default::default()
    }
}

fn named(name: &str, number: i32, ty: Type, type_name: &str) -> FieldDescriptorProto {
    FieldDescriptorProto {
        type_name: Some(type_name.into()),
        ..scalar(name, number, ty)
    }
}

fn repeated(mut field: FieldDescriptorProto) -> FieldDescriptorProto {
    field.label = Some(Label::Repeated as i32);
    field
}

fn enumeration(name: &str, values: &[&str]) -> EnumDescriptorProto {
    EnumDescriptorProto {
        name: Some(name.into()),
        value: values
            .iter()
            .zip(0..)
            .map(|(value, number)| EnumValueDescriptorProto {
                name: Some(value.to_string()),
                number: Some(number),
            })
            .collect(),
    }
}

fn method(name: &str, input: &str, output: &str, client: bool, server: bool) -> MethodDescriptorProto {
    MethodDescriptorProto {
        name: Some(name.into()),
        input_type: Some(input.into()),
        output_type: Some(output.into()),
        client_streaming: Some(client),
        server_streaming: Some(server),
    }
}

fn generate_one(files: Vec<FileDescriptorProto>, path: &str) -> Result<GeneratedFile, Error> {
    let mut generated = generate(files, &[path], GeneratorOptions::default())?;
    Ok(generated.remove(0))
}

fn addressbook() -> FileDescriptorProto {
    let mut person = message(
        "Person",
        vec![
            scalar("name", 1, Type::String),
            scalar("id", 2, Type::Int32),
            scalar("email", 3, Type::String),
            repeated(named("phones", 4, Type::Message, ".tutorial.Person.PhoneNumber")),
        ],
    );
    person
        .enum_type
        .push(enumeration("PhoneType", &["MOBILE", "HOME", "WORK"]));
    person.nested_type.push(message(
        "PhoneNumber",
        vec![
            scalar("number", 1, Type::String),
            named("type", 2, Type::Enum, ".tutorial.Person.PhoneType"),
        ],
    ));

    let mut file = file("addressbook.proto", "tutorial", "proto3");
    file.message_type.push(person);
    file.message_type.push(message(
        "AddressBook",
        vec![repeated(named("people", 1, Type::Message, ".tutorial.Person"))],
    ));
    file
}

const ADDRESSBOOK_LISP: &str = r#";;; addressbook.lisp
;;;
;;; Generated by the protocol buffer compiler. DO NOT EDIT!

(cl:in-package #:common-lisp-user)

#+sbcl (cl:declaim (cl:optimize (cl:debug 0) (sb-c:store-coverage-data 0)))

(cl:eval-when (:compile-toplevel :load-toplevel :execute)
  (cl:unless (cl:find-package "CL-PROTOBUFS.TUTORIAL")
    (cl:defpackage "CL-PROTOBUFS.TUTORIAL" (:use))))

(cl:in-package "CL-PROTOBUFS.TUTORIAL")

(cl:eval-when (:compile-toplevel :load-toplevel :execute)
  (proto:define-schema 'addressbook
    :syntax :proto3
    :package "tutorial"))

;; Top-Level messages.

(proto:define-message person
    (:name "Person")
  ;; Nested enums.
  (proto:define-enum person.phone-type
      (:name "PhoneType")
    (:mobile :index 0)
    (:home :index 1)
    (:work :index 2))
  ;; Nested messages.
  (proto:define-message person.phone-number
      (:name "PhoneNumber")
    ;; Fields.
    (number
     :index 1 :type cl:string :kind :scalar :label (:singular) :json-name "number")
    (type
     :index 2 :type person.phone-type :kind :enum :label (:singular) :json-name "type" :default :mobile))
  ;; Fields.
  (name
   :index 1 :type cl:string :kind :scalar :label (:singular) :json-name "name")
  (id
   :index 2 :type cl-protobufs:int32 :kind :scalar :label (:singular) :json-name "id")
  (email
   :index 3 :type cl:string :kind :scalar :label (:singular) :json-name "email")
  (phones
   :index 4 :type person.phone-number :kind :message :label (:repeated :list) :json-name "phones"))

(proto:define-message address-book
    (:name "AddressBook")
  ;; Fields.
  (people
   :index 1 :type person :kind :message :label (:repeated :list) :json-name "people"))

(cl:eval-when (:compile-toplevel :load-toplevel :execute)
  (cl:setf (cl:gethash #P"addressbook.proto" proto-impl::*all-schemas*)
           (proto:find-schema 'addressbook)))

(cl:export '(addressbook
             person
             person.phone-type
             +person.phone-type-mobile+
             +person.phone-type-home+
             +person.phone-type-work+
             person.phone-number
             number
             type
             name
             id
             email
             phones
             address-book
             people))
"#;

#[test]
fn test_addressbook() {
    let generated = generate_one(vec![addressbook()], "addressbook.proto").unwrap();
    assert_eq!(generated.name, "addressbook.lisp");
    assert_eq!(generated.content, ADDRESSBOOK_LISP);
}

#[test]
fn test_generation_is_deterministic() {
    let first = generate_one(vec![addressbook()], "addressbook.proto").unwrap();
    let second = generate_one(vec![addressbook()], "addressbook.proto").unwrap();
    assert_eq!(first, second);
}

fn greeter() -> FileDescriptorProto {
    let mut file = file("helloworld.proto", "helloworld", "proto3");
    file.message_type.push(message("HelloRequest", vec![scalar("name", 1, Type::String)]));
    file.message_type.push(message("HelloReply", vec![scalar("message", 1, Type::String)]));
    file.service.push(ServiceDescriptorProto {
        name: Some("Greeter".into()),
        method: vec![
            method("SayHello", ".helloworld.HelloRequest", ".helloworld.HelloReply", false, false),
            method("LotsOfReplies", ".helloworld.HelloRequest", ".helloworld.HelloReply", false, true),
            method("LotsOfGreetings", ".helloworld.HelloRequest", ".helloworld.HelloReply", true, false),
            method("BidiHello", ".helloworld.HelloRequest", ".helloworld.HelloReply", true, true),
        ],
    });
    file
}

#[test]
fn test_streaming_service() {
    let content = generate_one(vec![greeter()], "helloworld.proto").unwrap().content;

    assert!(content.contains(
        "\n;; Services.\n\n(proto:define-service greeter\n    (:name \"Greeter\")\n  (say-hello (hello-request => hello-reply)\n   :name \"SayHello\"\n   :streaming :unary)"
    ));
    assert!(content.contains("(lots-of-replies (hello-request => hello-reply)\n   :name \"LotsOfReplies\"\n   :streaming :server-streaming)"));
    assert!(content.contains("(lots-of-greetings (hello-request => hello-reply)\n   :name \"LotsOfGreetings\"\n   :streaming :client-streaming)"));
    assert!(content.contains("(bidi-hello (hello-request => hello-reply)\n   :name \"BidiHello\"\n   :streaming :bidirectional))\n"));

    // Both packages are declared, in lexicographic order.
    let schema_package = content
        .find("(cl:defpackage \"CL-PROTOBUFS.HELLOWORLD\" (:use))")
        .unwrap();
    let rpc_package = content
        .find("(cl:defpackage \"CL-PROTOBUFS.HELLOWORLD-RPC\" (:use))")
        .unwrap();
    assert!(schema_package < rpc_package);

    assert!(content.contains(
        "(cl:export '(helloworld\n             hello-request\n             name\n             hello-reply\n             message\n             greeter))\n"
    ));
    assert!(content.ends_with(
        "\n(cl:in-package \"CL-PROTOBUFS.HELLOWORLD-RPC\")\n\n(cl:export '(call-say-hello\n             say-hello-impl\n             call-lots-of-replies\n             lots-of-replies-impl\n             call-lots-of-greetings\n             lots-of-greetings-impl\n             call-bidi-hello\n             bidi-hello-impl))\n"
    ));
}

#[test]
fn test_empty_file() {
    let generated = generate_one(vec![file("empty.proto", "empty", "proto2")], "empty.proto").unwrap();
    let expected = r#";;; empty.lisp
;;;
;;; Generated by the protocol buffer compiler. DO NOT EDIT!

(cl:in-package #:common-lisp-user)

#+sbcl (cl:declaim (cl:optimize (cl:debug 0) (sb-c:store-coverage-data 0)))

(cl:eval-when (:compile-toplevel :load-toplevel :execute)
  (cl:unless (cl:find-package "CL-PROTOBUFS.EMPTY")
    (cl:defpackage "CL-PROTOBUFS.EMPTY" (:use))))

(cl:in-package "CL-PROTOBUFS.EMPTY")

(cl:eval-when (:compile-toplevel :load-toplevel :execute)
  (proto:define-schema 'empty
    :syntax :proto2
    :package "empty"))

(cl:eval-when (:compile-toplevel :load-toplevel :execute)
  (cl:setf (cl:gethash #P"empty.proto" proto-impl::*all-schemas*)
           (proto:find-schema 'empty)))

(cl:export '(empty))
"#;
    assert_eq!(generated.content, expected);
}

#[test]
fn test_file_without_package() {
    let mut proto = file("dir/Plain.proto", "", "proto3");
    proto.message_type.push(message("Thing", vec![scalar("t", 1, Type::Bool)]));
    let content = generate_one(vec![proto], "dir/Plain.proto").unwrap().content;

    assert!(content.starts_with(";;; dir/Plain.lisp\n"));
    assert!(!content.contains("cl:defpackage"));
    assert!(!content.contains("(cl:in-package \""));
    assert!(!content.contains(":package"));
    assert!(!content.contains("cl:export"));
    assert!(content.contains("(proto:define-schema 'plain\n    :syntax :proto3))"));
    assert!(content.contains("#P\"dir/Plain.proto\""));
    // `t` is reserved
    assert!(content.contains("\n  (t%\n   :index 1 :type cl:boolean"));
}

fn common() -> FileDescriptorProto {
    let mut common = file("common.proto", "common", "proto3");
    common.message_type.push(message("Timestamp", vec![scalar("seconds", 1, Type::Int64)]));
    common.enum_type.push(enumeration("Level", &["LOW", "HIGH"]));
    common
}

fn event() -> FileDescriptorProto {
    let mut event = file("event.proto", "event", "proto3");
    event.dependency.push("common.proto".into());
    event.message_type.push(message(
        "Event",
        vec![
            named("at", 1, Type::Message, ".common.Timestamp"),
            named("level", 2, Type::Enum, ".common.Level"),
        ],
    ));
    event
}

#[test]
fn test_cross_file_references() {
    let content = generate_one(vec![common(), event()], "event.proto").unwrap().content;

    assert!(content.contains("    :package \"event\"\n    :import '(\"common.proto\")))\n"));
    let imported = content
        .find("(cl:defpackage \"CL-PROTOBUFS.COMMON\" (:use))")
        .unwrap();
    let own = content.find("(cl:defpackage \"CL-PROTOBUFS.EVENT\" (:use))").unwrap();
    assert!(imported < own);
    assert!(content.contains(
        "(at\n   :index 1 :type cl-protobufs.common::timestamp :kind :message :label (:optional) :json-name \"at\")"
    ));
    assert!(content.contains(
        "(level\n   :index 2 :type cl-protobufs.common::level :kind :enum :label (:singular) :json-name \"level\" :default :low)"
    ));
    // Imported types are not re-exported.
    assert!(!content.contains("timestamp\n"));
}

#[test]
fn test_order_independence() {
    let options = GeneratorOptions::default;
    let alone = generate(vec![common(), event()], &["event.proto"], options()).unwrap();
    let both = generate(vec![common(), event()], &["common.proto", "event.proto"], options()).unwrap();
    let reversed = generate(vec![common(), event()], &["event.proto", "common.proto"], options()).unwrap();

    assert_eq!(alone[0], both[1]);
    assert_eq!(alone[0], reversed[0]);
    assert_eq!(both[0], reversed[1]);
}

#[test]
fn test_multiple_imports_are_aligned() {
    let mut other = file("other.proto", "other", "proto3");
    other.message_type.push(message("Other", Vec::new()));
    let mut event = event();
    event.dependency.push("other.proto".into());

    let content = generate_one(vec![common(), other, event], "event.proto").unwrap().content;
    assert!(content.contains("    :import '(\"common.proto\"\n              \"other.proto\")))\n"));
    // Imported but unreferenced namespaces need no package declaration.
    assert!(!content.contains("CL-PROTOBUFS.OTHER"));
}

#[test]
fn test_reference_into_empty_namespace() {
    let mut plain = file("plain.proto", "", "proto3");
    plain.message_type.push(message("Blob", Vec::new()));
    let mut user = file("user.proto", "user", "proto3");
    user.dependency.push("plain.proto".into());
    user.message_type.push(message(
        "User",
        vec![named("blob", 1, Type::Message, ".Blob")],
    ));

    let content = generate_one(vec![plain, user], "user.proto").unwrap().content;
    assert!(content.contains(":type cl-user::blob :kind :message"));
}

#[test]
fn test_oneofs_maps_and_presence() {
    let mut counts_entry = message(
        "CountsEntry",
        vec![scalar("key", 1, Type::String), scalar("value", 2, Type::Int32)],
    );
    counts_entry.options = Some(MessageOptions {
        map_entry: Some(true),
    });

    let mut circle_field = named("circle", 1, Type::Message, ".shapes.Circle");
    circle_field.oneof_index = Some(0);
    let mut label_field = scalar("label", 2, Type::String);
    label_field.oneof_index = Some(0);
    let mut size = scalar("size", 4, Type::Int32);
    size.oneof_index = Some(1);
    size.proto3_optional = Some(true);

    let mut shape = message(
        "Shape",
        vec![
            circle_field,
            label_field,
            repeated(named("counts", 3, Type::Message, ".shapes.Shape.CountsEntry")),
            size,
            repeated(scalar("ids", 5, Type::Int32)),
            repeated(scalar("names", 6, Type::String)),
        ],
    );
    shape.nested_type.push(counts_entry);
    shape.oneof_decl = vec![
        OneofDescriptorProto {
            name: Some("kind".into()),
        },
        OneofDescriptorProto {
            name: Some("_size".into()),
        },
    ];

    let mut proto = file("shapes.proto", "shapes", "proto3");
    proto.message_type.push(message("Circle", vec![scalar("radius", 1, Type::Double)]));
    proto.message_type.push(shape);

    let content = generate_one(vec![proto], "shapes.proto").unwrap().content;

    assert!(content.contains(
        "  ;; Fields.\n  (proto:define-oneof kind\n      ()\n    (circle\n     :index 1 :type circle :kind :message :label (:optional) :json-name \"circle\")\n    (label\n     :index 2 :type cl:string :kind :scalar :label (:optional) :json-name \"label\"))\n"
    ));
    assert!(content.contains(
        "\n  (proto:define-map counts\n   :index 3 :key-type cl:string :value-type cl-protobufs:int32 :value-kind :scalar :json-name \"counts\")\n"
    ));
    assert!(content.contains(
        "\n  (size\n   :index 4 :type cl-protobufs:int32 :kind :scalar :label (:optional) :json-name \"size\")\n"
    ));
    assert!(content.contains(":label (:repeated :list) :json-name \"ids\" :packed cl:t)"));
    assert!(content.contains(":label (:repeated :list) :json-name \"names\"))"));
    assert!(!content.contains("CountsEntry"));
    assert!(!content.contains(";; Nested messages."));
    assert!(!content.contains("_size"));
    // The `circle` accessor shares the already exported message symbol.
    assert!(content.contains(
        "             shape\n             label\n             counts\n             size\n             ids\n             names))\n"
    ));
}

#[test]
fn test_proto2_defaults_and_packing() {
    let mut name = scalar("name", 1, Type::String);
    name.label = Some(Label::Required as i32);
    name.default_value = Some("n/a".into());
    let mut retries = scalar("retries", 2, Type::Int32);
    retries.default_value = Some("3".into());
    let mut packed = repeated(scalar("ids", 3, Type::Int32));
    packed.options = Some(FieldOptions { packed: Some(true) });
    let mut ratio = scalar("ratio", 4, Type::Double);
    ratio.default_value = Some("0.5".into());
    let mut magic = scalar("magic", 5, Type::Bytes);
    magic.default_value = Some("\\001\\002".into());
    let mut mode = named("mode", 7, Type::Enum, ".settings.Mode");
    mode.default_value = Some("FAST".into());
    let mut sub = named("sub", 8, Type::Group, ".settings.Config.Sub");
    sub.json_name = Some("subGroup".into());

    let mut config = message(
        "Config",
        vec![
            name,
            retries,
            packed,
            ratio,
            magic,
            repeated(scalar("plain", 6, Type::Int32)),
            mode,
            sub,
        ],
    );
    config.nested_type.push(message("Sub", Vec::new()));

    let mut proto = file("settings.proto", "settings", "proto2");
    proto.enum_type.push(enumeration("Mode", &["SLOW", "FAST"]));
    proto.message_type.push(config);

    let content = generate_one(vec![proto], "settings.proto").unwrap().content;

    assert!(content.contains(":label (:required) :json-name \"name\" :default \"n/a\")"));
    assert!(content.contains(":label (:optional) :json-name \"retries\" :default 3)"));
    assert!(content.contains(":json-name \"ids\" :packed cl:t)"));
    assert!(content.contains(":type cl:double-float :kind :scalar :label (:optional) :json-name \"ratio\" :default 0.5d0)"));
    assert!(content.contains(":json-name \"magic\" :default #(1 2))"));
    assert!(content.contains(":label (:repeated :list) :json-name \"plain\")"));
    assert!(content.contains(":type mode :kind :enum :label (:optional) :json-name \"mode\" :default :fast)"));
    assert!(content.contains(":type config.sub :kind :group :label (:optional) :json-name \"subGroup\")"));
    assert!(content.contains("\n;; Top-Level enums.\n\n(proto:define-enum mode\n    (:name \"Mode\")\n  (:slow :index 0)\n  (:fast :index 1))\n"));
}

#[test]
fn test_extensions() {
    let mut base = file("base.proto", "base", "proto2");
    base.message_type.push(message("Base", Vec::new()));

    let mut nickname = scalar("nickname", 100, Type::String);
    nickname.extendee = Some(".base.Base".into());
    let mut ext = file("ext.proto", "ext", "proto2");
    ext.dependency.push("base.proto".into());
    ext.extension.push(nickname);

    let content = generate_one(vec![base, ext], "ext.proto").unwrap().content;
    assert!(content.contains(
        "\n;; Top-Level extensions.\n\n(proto:define-extend cl-protobufs.base::base\n    ()\n  (nickname\n   :index 100 :type cl:string :kind :scalar :label (:optional) :json-name \"nickname\"))\n"
    ));
    assert!(content.contains("(cl:defpackage \"CL-PROTOBUFS.BASE\" (:use))"));
    assert!(content.contains("(cl:export '(ext))"));
}

#[test]
fn test_field_collision() {
    let mut proto = file("clash.proto", "clash", "proto3");
    proto.message_type.push(message(
        "Clash",
        vec![scalar("foo_bar", 1, Type::Int32), scalar("fooBar", 2, Type::Int32)],
    ));

    let err = generate_one(vec![proto], "clash.proto").unwrap_err();
    let Error::IdentifierCollision {
        identifier,
        first,
        second,
        ..
    } = err
    else {
        panic!("expected a collision, got {err}");
    };
    assert_eq!(identifier, "foo-bar");
    assert_eq!(first, "foo_bar");
    assert_eq!(second, "fooBar");
}

#[test]
fn test_type_collision() {
    let mut proto = file("clash.proto", "clash", "proto3");
    proto.message_type.push(message("HTTPServer", Vec::new()));
    proto.message_type.push(message("HttpServer", Vec::new()));

    let err = generate_one(vec![proto], "clash.proto").unwrap_err();
    assert!(matches!(
        err,
        Error::IdentifierCollision { identifier, .. } if identifier == "http-server"
    ));
}

#[test]
fn test_unresolved_type() {
    let mut proto = file("broken.proto", "broken", "proto3");
    proto.message_type.push(message(
        "Broken",
        vec![named("missing", 1, Type::Message, ".broken.Missing")],
    ));

    let err = generate_one(vec![proto], "broken.proto").unwrap_err();
    assert_eq!(
        err.to_string(),
        "`broken.Broken.missing` references unknown type `.broken.Missing`"
    );
}

#[test]
fn test_unknown_syntax() {
    let proto = file("edition.proto", "edition", "editions");
    let err = generate_one(vec![proto], "edition.proto").unwrap_err();
    assert!(matches!(err, Error::UnknownSyntax { syntax, .. } if syntax == "editions"));
}

#[test]
fn test_package_options() {
    let mut options = GeneratorOptions::new();
    options.package_override("tutorial", "addressbook-pkg");
    let generated = generate(vec![addressbook()], &["addressbook.proto"], options).unwrap();
    assert!(generated[0]
        .content
        .contains("(cl:in-package \"ADDRESSBOOK-PKG\")"));

    let options = GeneratorOptions::from_parameter("package_prefix=PB.").unwrap();
    let generated = generate(vec![addressbook()], &["addressbook.proto"], options).unwrap();
    assert!(generated[0].content.contains("(cl:in-package \"PB.TUTORIAL\")"));
}

#[test]
fn test_multiline_string_default() {
    let mut greeting = scalar("greeting", 1, Type::String);
    greeting.default_value = Some("line1\nline2".into());
    let mut outer = message("Outer", Vec::new());
    outer.nested_type.push(message("Inner", vec![greeting]));

    let mut proto = file("greetings.proto", "greetings", "proto2");
    proto.message_type.push(outer);

    let content = generate_one(vec![proto], "greetings.proto").unwrap().content;
    assert!(content.contains(
        "    (greeting\n     :index 1 :type cl:string :kind :scalar :label (:optional) :json-name \"greeting\" :default \"line1\nline2\"))"
    ));
}

#[test]
fn test_nested_extension() {
    let mut tag = scalar("tag", 100, Type::Int32);
    tag.extendee = Some(".ext.Outer".into());
    let mut outer = message("Outer", vec![scalar("id", 1, Type::Int32)]);
    outer.nested_type.push(message("Inner", Vec::new()));
    outer.extension.push(tag);

    let mut proto = file("ext.proto", "ext", "proto2");
    proto.message_type.push(outer);

    let content = generate_one(vec![proto.clone()], "ext.proto").unwrap().content;
    assert!(content.contains(
        "\n(proto:define-message outer\n    (:name \"Outer\")\n  ;; Nested messages.\n  (proto:define-message outer.inner\n      (:name \"Inner\"))\n  ;; Nested extensions.\n  (proto:define-extend outer\n      ()\n    (tag\n     :index 100 :type cl-protobufs:int32 :kind :scalar :label (:optional) :json-name \"tag\"))\n  ;; Fields.\n  (id\n   :index 1 :type cl-protobufs:int32 :kind :scalar :label (:optional) :json-name \"id\"))\n"
    ));
    // Nested extensions export nothing.
    assert!(content.contains("(cl:export '(ext\n             outer\n             outer.inner\n             id))\n"));

    proto.message_type[0].extension[0].extendee = Some(".ext.Missing".into());
    let err = generate_one(vec![proto], "ext.proto").unwrap_err();
    assert_eq!(
        err.to_string(),
        "`ext.Outer.tag` references unknown type `.ext.Missing`"
    );
}

#[test]
fn test_packages_sharing_a_lisp_package() {
    let mut a = file("a.proto", "fooBar", "proto3");
    a.message_type.push(message("Thing", Vec::new()));
    let mut b = file("b.proto", "foo_bar", "proto3");
    b.message_type.push(message("Thing", Vec::new()));

    let err = generate(vec![a, b], &["a.proto", "b.proto"], GeneratorOptions::default())
        .unwrap_err();
    assert!(matches!(
        err,
        Error::IdentifierCollision { identifier, .. } if identifier == "CL-PROTOBUFS.FOO-BAR"
    ));

    // One package split over two files shares a type scope.
    let mut a = file("a.proto", "shop", "proto3");
    a.message_type.push(message("OrderID", Vec::new()));
    let mut b = file("b.proto", "shop", "proto3");
    b.enum_type.push(enumeration("OrderId", &["NONE"]));

    let err = generate(vec![a, b], &["b.proto"], GeneratorOptions::default()).unwrap_err();
    assert!(matches!(
        err,
        Error::IdentifierCollision { identifier, .. } if identifier == "order-id"
    ));
}

fn directory(inputs: [&str; 2]) -> FileDescriptorProto {
    let mut proto = file("directory.proto", "svc", "proto3");
    for name in ["UserRequest", "GroupRequest", "Reply"] {
        proto.message_type.push(message(name, Vec::new()));
    }
    for (service, input) in ["Users", "Groups"].into_iter().zip(inputs) {
        proto.service.push(ServiceDescriptorProto {
            name: Some(service.into()),
            method: vec![method("Get", input, ".svc.Reply", false, false)],
        });
    }
    proto
}

#[test]
fn test_services_sharing_method_names() {
    let proto = directory([".svc.UserRequest", ".svc.GroupRequest"]);
    let content = generate_one(vec![proto], "directory.proto").unwrap().content;
    assert!(content.contains("(get (user-request => reply)"));
    assert!(content.contains("(get (group-request => reply)"));
    assert!(content.ends_with(
        "\n(cl:in-package \"CL-PROTOBUFS.SVC-RPC\")\n\n(cl:export '(call-get\n             get-impl))\n"
    ));

    // Same stub specialized on the same request type.
    let proto = directory([".svc.UserRequest", ".svc.UserRequest"]);
    let err = generate_one(vec![proto], "directory.proto").unwrap_err();
    let Error::IdentifierCollision { first, second, .. } = err else {
        panic!("expected a collision, got {err}");
    };
    assert_eq!(first, "svc.Users.Get");
    assert_eq!(second, "svc.Groups.Get");
}
